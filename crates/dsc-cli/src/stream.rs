//! Resolver declaration stream.
//!
//! A JSON document listing declarations in resolution order:
//!
//! ```json
//! {
//!   "module": "app",
//!   "declarations": [
//!     { "key": "box", "kind": "class", "name": "Box" },
//!     { "key": "box.T", "kind": "type_parameter", "name": "T", "container": "box" },
//!     { "kind": "property", "name": "value", "container": "box", "type": { "param": "box.T" } }
//!   ]
//! }
//! ```
//!
//! `container` names the `key` of an earlier entry; omitted means the root
//! namespace. Types may refer to any keyed entry, earlier or later: every
//! declaration is made first and signatures are filled in afterwards.

use anyhow::{Context, Result, anyhow, bail};
use dsc_model::{
    Annotation, ClassKind, ConstantValue, DeclarationDetail, DeclarationRequest, DescriptorId,
    DescriptorKind, IntrinsicKind, ModuleBuilder, TypeId, Variance,
};
use indexmap::IndexMap;
use serde::Deserialize;
use smallvec::SmallVec;
use tracing::debug;

type TypeList = SmallVec<[TypeId; 4]>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationStream {
    pub module: String,
    #[serde(default)]
    pub declarations: Vec<StreamDeclaration>,
}

impl DeclarationStream {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse declaration stream")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Namespace,
    Class,
    Function,
    Property,
    TypeParameter,
    ValueParameter,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamClassKind {
    #[default]
    Class,
    Interface,
    Object,
    EnumClass,
    AnnotationClass,
}

impl From<StreamClassKind> for ClassKind {
    fn from(kind: StreamClassKind) -> Self {
        match kind {
            StreamClassKind::Class => ClassKind::Class,
            StreamClassKind::Interface => ClassKind::Interface,
            StreamClassKind::Object => ClassKind::Object,
            StreamClassKind::EnumClass => ClassKind::EnumClass,
            StreamClassKind::AnnotationClass => ClassKind::AnnotationClass,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamVariance {
    #[default]
    Invariant,
    In,
    Out,
}

impl From<StreamVariance> for Variance {
    fn from(variance: StreamVariance) -> Self {
        match variance {
            StreamVariance::Invariant => Variance::Invariant,
            StreamVariance::In => Variance::In,
            StreamVariance::Out => Variance::Out,
        }
    }
}

/// A type written against the stream's keys.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Intrinsic {
        intrinsic: String,
    },
    Param {
        param: String,
    },
    Class {
        class: String,
        #[serde(default)]
        args: Vec<TypeSpec>,
    },
    Function {
        function: FunctionSpec,
    },
    Nullable {
        nullable: Box<TypeSpec>,
    },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FunctionSpec {
    #[serde(default)]
    pub params: Vec<TypeSpec>,
    pub ret: Box<TypeSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ConstantSpec {
    Bool(bool),
    Int(i64),
    String(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AnnotationArgumentSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub value: ConstantSpec,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AnnotationSpec {
    pub name: String,
    #[serde(default)]
    pub args: Vec<AnnotationArgumentSpec>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamDeclaration {
    /// Handle later entries use to refer to this one.
    #[serde(default)]
    pub key: Option<String>,
    pub kind: StreamKind,
    pub name: String,
    #[serde(default)]
    pub container: Option<String>,
    /// Property and value parameter type.
    #[serde(default, rename = "type")]
    pub ty: Option<TypeSpec>,
    /// Function return type; `Unit` when omitted.
    #[serde(default)]
    pub returns: Option<TypeSpec>,
    #[serde(default)]
    pub class_kind: StreamClassKind,
    #[serde(default)]
    pub supertypes: Vec<TypeSpec>,
    #[serde(default)]
    pub variance: StreamVariance,
    #[serde(default)]
    pub reified: bool,
    #[serde(default)]
    pub bounds: Vec<TypeSpec>,
    #[serde(default)]
    pub mutable: bool,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub vararg: bool,
    #[serde(default)]
    pub annotations: Vec<AnnotationSpec>,
}

/// Keyed declarations of a loaded stream.
#[derive(Debug, Default)]
pub struct StreamIndex {
    keys: IndexMap<String, DescriptorId>,
}

impl StreamIndex {
    pub fn get(&self, key: &str) -> Option<DescriptorId> {
        self.keys.get(key).copied()
    }

    pub fn resolve(&self, key: &str) -> Result<DescriptorId> {
        self.get(key)
            .ok_or_else(|| anyhow!("unknown declaration key `{key}`"))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Feed every declaration of `stream` into `builder`.
pub fn load_stream(builder: &mut ModuleBuilder<'_>, stream: &DeclarationStream) -> Result<StreamIndex> {
    let mut index = StreamIndex::default();
    let mut declared = Vec::with_capacity(stream.declarations.len());

    for (position, decl) in stream.declarations.iter().enumerate() {
        let container = decl
            .container
            .as_deref()
            .map(|key| index.resolve(key))
            .transpose()
            .with_context(|| format!("declaration #{position} `{}`", decl.name))?;
        let request = placeholder_request(builder, decl, container);
        let id = builder
            .declare(request)
            .with_context(|| format!("declaration #{position} `{}`", decl.name))?;
        if let Some(key) = &decl.key
            && index.keys.insert(key.clone(), id).is_some()
        {
            bail!("duplicate declaration key `{key}`");
        }
        declared.push(id);
    }

    for (decl, &id) in stream.declarations.iter().zip(&declared) {
        complete_signature(builder, &index, decl, id)
            .with_context(|| format!("signature of `{}`", decl.name))?;
    }
    debug!(
        declarations = declared.len(),
        keys = index.len(),
        "declaration stream loaded"
    );
    Ok(index)
}

/// The request without any types; those are filled in once every key exists.
fn placeholder_request(
    builder: &ModuleBuilder<'_>,
    decl: &StreamDeclaration,
    container: Option<DescriptorId>,
) -> DeclarationRequest {
    let interner = builder.interner();
    let detail = match decl.kind {
        StreamKind::Namespace => DeclarationDetail::Namespace,
        StreamKind::Class => DeclarationDetail::Class {
            class_kind: decl.class_kind.into(),
            supertypes: Vec::new(),
        },
        StreamKind::Function => DeclarationDetail::Function {
            return_type: TypeId::UNIT,
        },
        StreamKind::Property => DeclarationDetail::Property {
            ty: TypeId::ERROR,
            mutable: decl.mutable,
        },
        StreamKind::TypeParameter => DeclarationDetail::TypeParameter {
            variance: decl.variance.into(),
            reified: decl.reified,
            upper_bounds: Default::default(),
        },
        StreamKind::ValueParameter => DeclarationDetail::ValueParameter {
            ty: TypeId::ERROR,
            has_default: decl.has_default,
            vararg: decl.vararg,
        },
    };
    let mut request = DeclarationRequest::new(interner.intern_string(&decl.name), container, detail);
    for annotation in &decl.annotations {
        request = request.with_annotation(build_annotation(builder, annotation));
    }
    request
}

fn build_annotation(builder: &ModuleBuilder<'_>, spec: &AnnotationSpec) -> Annotation {
    let interner = builder.interner();
    spec.args.iter().fold(
        Annotation::marker(interner.intern_string(&spec.name)),
        |annotation, arg| {
            let value = match &arg.value {
                ConstantSpec::Bool(value) => ConstantValue::Bool(*value),
                ConstantSpec::Int(value) => ConstantValue::Int(*value),
                ConstantSpec::String(value) => ConstantValue::String(interner.intern_string(value)),
            };
            let name = arg.name.as_deref().map(|name| interner.intern_string(name));
            annotation.with_argument(name, value)
        },
    )
}

fn complete_signature(
    builder: &mut ModuleBuilder<'_>,
    index: &StreamIndex,
    decl: &StreamDeclaration,
    id: DescriptorId,
) -> Result<()> {
    match decl.kind {
        StreamKind::Namespace => {}
        StreamKind::Class => {
            let supertypes = resolve_types(builder, index, &decl.supertypes)?;
            builder.set_supertypes(id, supertypes.into_vec())?;
        }
        StreamKind::Function => {
            if let Some(returns) = &decl.returns {
                let ty = resolve_type(builder, index, returns)?;
                builder.set_return_type(id, ty)?;
            }
        }
        StreamKind::Property | StreamKind::ValueParameter => {
            let Some(spec) = &decl.ty else {
                bail!("{} `{}` has no type", kind_name(decl.kind), decl.name);
            };
            let ty = resolve_type(builder, index, spec)?;
            builder.set_declared_type(id, ty)?;
        }
        StreamKind::TypeParameter => {
            for bound in &decl.bounds {
                let ty = resolve_type(builder, index, bound)?;
                builder.add_upper_bound(id, ty)?;
            }
        }
    }
    Ok(())
}

fn kind_name(kind: StreamKind) -> &'static str {
    let kind = match kind {
        StreamKind::Namespace => DescriptorKind::Namespace,
        StreamKind::Class => DescriptorKind::Class,
        StreamKind::Function => DescriptorKind::Function,
        StreamKind::Property => DescriptorKind::Property,
        StreamKind::TypeParameter => DescriptorKind::TypeParameter,
        StreamKind::ValueParameter => DescriptorKind::ValueParameter,
    };
    kind.name()
}

fn resolve_types(
    builder: &ModuleBuilder<'_>,
    index: &StreamIndex,
    specs: &[TypeSpec],
) -> Result<TypeList> {
    specs
        .iter()
        .map(|spec| resolve_type(builder, index, spec))
        .collect()
}

/// Intern the type `spec` describes.
pub fn resolve_type(
    builder: &ModuleBuilder<'_>,
    index: &StreamIndex,
    spec: &TypeSpec,
) -> Result<TypeId> {
    let interner = builder.interner();
    Ok(match spec {
        TypeSpec::Intrinsic { intrinsic } => parse_intrinsic(intrinsic)?,
        TypeSpec::Param { param } => builder.type_parameter_type(index.resolve(param)?)?,
        TypeSpec::Class { class, args } => {
            let args = resolve_types(builder, index, args)?;
            builder.class_type(index.resolve(class)?, &args)?
        }
        TypeSpec::Function { function } => {
            let params = resolve_types(builder, index, &function.params)?;
            let ret = resolve_type(builder, index, &function.ret)?;
            interner.function(&params, ret)
        }
        TypeSpec::Nullable { nullable } => interner.nullable(resolve_type(builder, index, nullable)?),
    })
}

pub fn parse_intrinsic(name: &str) -> Result<TypeId> {
    IntrinsicKind::from_name(name)
        .map(IntrinsicKind::type_id)
        .ok_or_else(|| anyhow!("unknown intrinsic type `{name}`"))
}

#[cfg(test)]
#[path = "../tests/stream_tests.rs"]
mod tests;
