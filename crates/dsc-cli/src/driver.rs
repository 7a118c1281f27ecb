//! One `dsc` invocation: options, input, build, freeze, render.

use crate::args::{CliArgs, ConflictMode};
use crate::stream::{DeclarationStream, StreamIndex, load_stream, parse_intrinsic};
use anyhow::{Context, Result, bail};
use dsc_common::options::ModelOptions;
use dsc_model::{
    CollectConflicts, Declaration, DeclarationDescriptor, DescriptorIdAllocator, DescriptorTable,
    FirstWins, LastWins, ModuleBuilder, NameConflict, Substitutable, TypeInterner,
    TypeSubstitution, TypeSubstitutor, render_tree,
};
use std::fmt::Write;
use std::io::Read;
use std::path::Path;
use tracing::info;

pub fn run(args: &CliArgs) -> Result<String> {
    let options = load_options(args.options.as_deref())?;
    if args.show_options {
        let mut json = options.to_json().context("failed to serialize options")?;
        json.push('\n');
        return Ok(json);
    }
    let Some(input) = args.input.as_deref() else {
        bail!("no declaration stream given (pass a file or `-` for stdin)");
    };
    let text = read_input(input)?;
    process(&text, args, options)
}

/// Options from `path`, or the defaults.
pub fn load_options(path: Option<&Path>) -> Result<ModelOptions> {
    let Some(path) = path else {
        return Ok(ModelOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options {}", path.display()))?;
    ModelOptions::from_json(&text)
        .with_context(|| format!("failed to parse options {}", path.display()))
}

/// Read the stream from `path`; `-` reads stdin.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read declaration stream from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Build and freeze the module described by `text` and render the result.
pub fn process(text: &str, args: &CliArgs, options: ModelOptions) -> Result<String> {
    let stream = DeclarationStream::from_json(text)?;
    let interner = TypeInterner::with_options(&options);
    let ids = DescriptorIdAllocator::new();
    let mut builder = ModuleBuilder::with_options(&stream.module, &interner, &ids, options.clone());
    let index = load_stream(&mut builder, &stream)?;

    let mut out = String::new();
    let table = match args.conflicts {
        ConflictMode::FirstWins => builder.freeze(&mut FirstWins)?,
        ConflictMode::LastWins => builder.freeze(&mut LastWins)?,
        ConflictMode::Report => {
            let mut policy = CollectConflicts::new();
            let table = builder.freeze(&mut policy)?;
            for conflict in &policy.collected {
                let _ = writeln!(out, "{}", describe_conflict(&interner, &table, conflict));
            }
            table
        }
    };
    table.verify()?;
    info!(
        module = %stream.module,
        descriptors = table.len(),
        "module frozen"
    );

    let root = match &args.specialize {
        Some(key) => specialize(&interner, &table, &index, key, &args.type_args, &options)?,
        None => DeclarationDescriptor::Module(table.module().clone()),
    };
    out.push_str(&render_tree(&interner, &root, args.ids));
    Ok(out)
}

fn specialize(
    interner: &TypeInterner,
    table: &DescriptorTable,
    index: &StreamIndex,
    key: &str,
    type_args: &[String],
    options: &ModelOptions,
) -> Result<DeclarationDescriptor> {
    let id = index.resolve(key)?;
    let class = table
        .get(id)
        .and_then(DeclarationDescriptor::as_class)
        .with_context(|| format!("`{key}` is not a class of the frozen module"))?;
    let type_args = type_args
        .iter()
        .map(|name| parse_intrinsic(name))
        .collect::<Result<Vec<_>>>()?;
    if type_args.len() != class.type_parameters.len() {
        bail!(
            "`{key}` takes {} type argument(s), got {}",
            class.type_parameters.len(),
            type_args.len()
        );
    }
    let map = TypeSubstitution::from_args(&class.type_parameters, &type_args);
    let substitutor = TypeSubstitutor::with_options(interner, &map, options);
    Ok(DeclarationDescriptor::Class(class.substitute(&substitutor)))
}

fn describe_conflict(
    interner: &TypeInterner,
    table: &DescriptorTable,
    conflict: &NameConflict,
) -> String {
    let container = table
        .get(conflict.container)
        .map(|d| interner.resolve_atom(d.name()))
        .unwrap_or_else(|| conflict.container.to_string());
    let candidates: Vec<String> = conflict
        .candidates
        .iter()
        .map(ToString::to_string)
        .collect();
    format!(
        "conflict: {} `{}` in {} declared {} times ({}); keeping {}",
        conflict.kind.name(),
        interner.resolve_atom(conflict.name),
        container,
        conflict.candidates.len(),
        candidates.join(", "),
        conflict.first()
    )
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
