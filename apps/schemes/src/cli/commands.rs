//! # CLI Command Implementations
//!
//! Each command loads one scheme document into a fresh arena, runs one
//! operation and writes its result to the given sink.

use super::{MatchArgs, Settings};
use schemes_core::{ComponentId, Graph, NameMatcher, Scheme, SchemeError, write_dot};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum scheme document size (100 MB).
const MAX_SCHEME_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate an input path: it must exist, be a regular file and stay under
/// the size limit. Returns the canonical path.
fn validate_file_path(path: &Path) -> Result<PathBuf, SchemeError> {
    let canonical = path.canonicalize().map_err(|e| {
        SchemeError::InvalidArgument(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(SchemeError::InvalidArgument(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    let size = std::fs::metadata(&canonical)?.len();
    if size > MAX_SCHEME_FILE_SIZE {
        return Err(SchemeError::InvalidArgument(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            size, MAX_SCHEME_FILE_SIZE
        )));
    }

    Ok(canonical)
}

/// Validate an output path: its parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, SchemeError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        SchemeError::InvalidArgument(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(SchemeError::InvalidArgument(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| SchemeError::InvalidArgument("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Load the scheme document at `path` into a new arena.
pub fn load_document(path: &Path) -> Result<(Graph, Scheme), SchemeError> {
    let path = validate_file_path(path)?;
    let mut graph = Graph::new();
    let mut scheme = Scheme::new();
    scheme.load(&mut graph, &path)?;
    tracing::info!(path = %path.display(), members = scheme.len(), "scheme loaded");
    Ok((graph, scheme))
}

fn print_json(out: &mut dyn Write, value: &serde_json::Value) -> Result<(), SchemeError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| SchemeError::InvalidArgument(format!("JSON encoding failed: {}", e)))?;
    writeln!(out, "{}", text)?;
    Ok(())
}

fn names(graph: &Graph, ids: &[ComponentId]) -> Vec<String> {
    ids.iter()
        .map(|&id| graph.name(id).unwrap_or_default().to_string())
        .collect()
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Report members, roots, leaves and family validity.
pub fn cmd_check(file: &Path, settings: Settings, out: &mut dyn Write) -> Result<(), SchemeError> {
    let (graph, scheme) = load_document(file)?;
    let valid = scheme.all_families_valid(&graph);

    if settings.json_mode {
        let output = serde_json::json!({
            "file": file.to_string_lossy(),
            "members": scheme.len(),
            "roots": names(&graph, scheme.roots()),
            "leaves": names(&graph, scheme.leaves()),
            "families_valid": valid,
        });
        return print_json(out, &output);
    }

    writeln!(out, "Scheme: {}", file.display())?;
    writeln!(out, "Members:        {}", scheme.len())?;
    writeln!(out, "Roots:          {}", scheme.roots().len())?;
    writeln!(out, "Leaves:         {}", scheme.leaves().len())?;
    writeln!(out, "Families valid: {}", if valid { "yes" } else { "no" })?;
    Ok(())
}

// =============================================================================
// TREE COMMAND
// =============================================================================

/// Print the tree below every root.
pub fn cmd_tree(file: &Path, settings: Settings, out: &mut dyn Write) -> Result<(), SchemeError> {
    let (graph, scheme) = load_document(file)?;
    let tree = scheme.roots_to_string(&graph);

    if settings.json_mode {
        return print_json(out, &serde_json::json!({ "tree": tree }));
    }
    write!(out, "{}", tree)?;
    Ok(())
}

// =============================================================================
// FIND COMMAND
// =============================================================================

/// Print the components matching the selected matcher, one per line.
pub fn cmd_find(
    file: &Path,
    args: &MatchArgs,
    settings: Settings,
    out: &mut dyn Write,
) -> Result<(), SchemeError> {
    let matcher = match (&args.name, &args.regex, &args.contains) {
        (Some(name), _, _) => NameMatcher::exact(name.as_str()),
        (None, Some(pattern), _) => NameMatcher::pattern(pattern).map_err(|e| {
            SchemeError::InvalidArgument(format!("Invalid pattern '{}': {}", pattern, e))
        })?,
        (None, None, Some(text)) => NameMatcher::substring(text, settings.case_sensitive),
        (None, None, None) => {
            return Err(SchemeError::InvalidArgument(
                "One of --name, --regex or --contains is required".to_string(),
            ));
        }
    };

    let (graph, scheme) = load_document(file)?;
    let found = scheme.find(&graph, &matcher, settings.order);
    tracing::debug!(matches = found.len(), order = ?settings.order, "search finished");

    if settings.json_mode {
        let matches: Vec<serde_json::Value> = found
            .iter()
            .map(|&id| {
                serde_json::json!({
                    "name": graph.name(id),
                    "description": graph.info(id).and_then(|i| i.description()),
                    "member": scheme.members().contains(&id),
                    "parents": graph.parents(id).len(),
                    "children": graph.children(id).len(),
                })
            })
            .collect();
        return print_json(out, &serde_json::json!({ "matches": matches }));
    }

    for name in names(&graph, &found) {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

// =============================================================================
// SORT COMMAND
// =============================================================================

/// Half-sort the scheme and save it to `target`.
pub fn cmd_sort(
    file: &Path,
    target: &Path,
    settings: Settings,
    out: &mut dyn Write,
) -> Result<(), SchemeError> {
    let (graph, mut scheme) = load_document(file)?;
    let target = validate_output_path(target)?;

    scheme.halfsort_hierarchically(&graph);
    scheme.save(&graph, &target)?;
    tracing::info!(path = %target.display(), "sorted scheme saved");

    if settings.json_mode {
        let output = serde_json::json!({
            "output": target.to_string_lossy(),
            "order": names(&graph, scheme.members()),
        });
        return print_json(out, &output);
    }
    writeln!(out, "Sorted {} members into {}", scheme.len(), target.display())?;
    Ok(())
}

// =============================================================================
// DOT COMMAND
// =============================================================================

/// Export the scheme as DOT to `output`, or to `out` when there is none.
pub fn cmd_dot(
    file: &Path,
    output: Option<&Path>,
    settings: Settings,
    out: &mut dyn Write,
) -> Result<(), SchemeError> {
    let (graph, scheme) = load_document(file)?;

    let Some(output) = output else {
        write_dot(&graph, &scheme, &mut *out)?;
        writeln!(out)?;
        return Ok(());
    };

    let target = validate_output_path(output)?;
    write_dot(&graph, &scheme, BufWriter::new(File::create(&target)?))?;
    tracing::info!(path = %target.display(), "DOT exported");

    if settings.json_mode {
        return print_json(out, &serde_json::json!({ "output": target.to_string_lossy() }));
    }
    writeln!(out, "Exported {} members to {}", scheme.len(), target.display())?;
    Ok(())
}

// =============================================================================
// COPY COMMAND
// =============================================================================

/// Deep-copy the scheme, check the copy against the source and save it.
pub fn cmd_copy(
    file: &Path,
    output: &Path,
    settings: Settings,
    out: &mut dyn Write,
) -> Result<(), SchemeError> {
    let (mut graph, scheme) = load_document(file)?;
    let target = validate_output_path(output)?;

    let mut copy = scheme.deep_copy(&mut graph)?;
    if !scheme.deep_equals(&graph, &copy) {
        return Err(SchemeError::InvalidArgument(
            "Copy is not deep-equal to its source".to_string(),
        ));
    }
    if settings.sort_before_save {
        copy.halfsort_hierarchically(&graph);
    }
    copy.save(&graph, &target)?;
    tracing::info!(path = %target.display(), components = graph.component_count(), "copy saved");

    if settings.json_mode {
        let output = serde_json::json!({
            "output": target.to_string_lossy(),
            "members": copy.len(),
            "deep_equal": true,
        });
        return print_json(out, &output);
    }
    writeln!(out, "Copied {} members to {}", copy.len(), target.display())?;
    Ok(())
}
