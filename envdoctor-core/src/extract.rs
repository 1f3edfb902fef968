//! Environment key extraction from JavaScript/TypeScript syntax trees.
//!
//! Recognised access idioms:
//! - `process.env.KEY` / `process.env["KEY"]`
//! - `import.meta.env.KEY` / `import.meta.env["KEY"]`
//! - `import { KEY } from "$env/static/private"` and `astro:env/*` modules
//!
//! Only statically known keys are collected: `process.env[name]` and
//! template literals are skipped. Renamed imports contribute the imported
//! name, never the local alias.

use std::path::Path;
use tracing::trace;
use tree_sitter::Node;

use crate::error::EnvDoctorResult;
use crate::keys::KeySet;
use crate::parse::SourceParser;

/// Import sources that bind environment variables as named exports.
pub const ENV_MODULE_PREFIXES: &[&str] = &["$env/", "astro:env/"];

/// Which object an `env` property hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnvRoot {
    /// `process.env`
    Process,
    /// `import.meta.env`
    ImportMeta,
}

/// Parse `content` and collect every environment key it references.
///
/// Fails only when the file cannot be parsed; callers treat that as a
/// file contributing no keys.
pub fn extract_env_keys(
    parser: &mut SourceParser,
    path: &Path,
    content: &str,
) -> EnvDoctorResult<KeySet> {
    let tree = parser.parse(path, content)?;
    let mut keys = KeySet::new();
    collect_env_keys(tree.root_node(), content.as_bytes(), &mut keys);
    Ok(keys)
}

/// Walk every node below `root` and add referenced keys to `keys`.
pub fn collect_env_keys(root: Node, source: &[u8], keys: &mut KeySet) {
    let mut cursor = root.walk();
    loop {
        visit_node(cursor.node(), source, keys);

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn visit_node(node: Node, source: &[u8], keys: &mut KeySet) {
    match node.kind() {
        "member_expression" => record_member_access(node, source, keys),
        "subscript_expression" => record_subscript_access(node, source, keys),
        "import_statement" => record_env_imports(node, source, keys),
        _ => {}
    }
}

/// `<envRoot>.KEY`
fn record_member_access(node: Node, source: &[u8], keys: &mut KeySet) {
    let (Some(object), Some(property)) = (
        node.child_by_field_name("object"),
        node.child_by_field_name("property"),
    ) else {
        return;
    };
    let Some(root) = env_root(object, source) else {
        return;
    };
    if property.kind() != "property_identifier" {
        return;
    }
    if let Some(name) = node_text(property, source) {
        trace!(?root, key = name, "env member access");
        insert_key(keys, name.to_string());
    }
}

/// `<envRoot>["KEY"]`
fn record_subscript_access(node: Node, source: &[u8], keys: &mut KeySet) {
    let (Some(object), Some(index)) = (
        node.child_by_field_name("object"),
        node.child_by_field_name("index"),
    ) else {
        return;
    };
    let Some(root) = env_root(object, source) else {
        return;
    };
    if index.kind() != "string" {
        return;
    }
    if let Some(value) = string_value(index, source) {
        trace!(?root, key = %value, "env subscript access");
        insert_key(keys, value);
    }
}

/// Named specifiers of `import { ... } from "$env/..."`.
fn record_env_imports(node: Node, source: &[u8], keys: &mut KeySet) {
    let Some(module) = node
        .child_by_field_name("source")
        .and_then(|s| string_value(s, source))
    else {
        return;
    };
    if !ENV_MODULE_PREFIXES.iter().any(|p| module.starts_with(p)) {
        return;
    }

    let mut cursor = node.walk();
    for clause in node.named_children(&mut cursor) {
        if clause.kind() != "import_clause" {
            continue;
        }
        let mut clause_cursor = clause.walk();
        for named in clause.named_children(&mut clause_cursor) {
            if named.kind() != "named_imports" {
                continue;
            }
            let mut spec_cursor = named.walk();
            for spec in named.named_children(&mut spec_cursor) {
                if spec.kind() != "import_specifier" {
                    continue;
                }
                if let Some(imported) = spec.child_by_field_name("name") {
                    let name = match imported.kind() {
                        "string" => string_value(imported, source),
                        _ => node_text(imported, source).map(str::to_string),
                    };
                    if let Some(name) = name {
                        insert_key(keys, name);
                    }
                }
            }
        }
    }
}

/// Resolve `object` to an environment root: `process.env` or `import.meta.env`.
fn env_root(object: Node, source: &[u8]) -> Option<EnvRoot> {
    if object.kind() != "member_expression" {
        return None;
    }
    let property = object.child_by_field_name("property")?;
    if property.kind() != "property_identifier" || node_text(property, source)? != "env" {
        return None;
    }

    let base = object.child_by_field_name("object")?;
    match base.kind() {
        "identifier" if node_text(base, source)? == "process" => Some(EnvRoot::Process),
        "meta_property" if is_import_meta(base) => Some(EnvRoot::ImportMeta),
        // Older grammars model `import.meta` as a member access on `import`.
        "member_expression"
            if base.child_by_field_name("object").map(|o| o.kind()) == Some("import")
                && base
                    .child_by_field_name("property")
                    .and_then(|p| node_text(p, source))
                    == Some("meta") =>
        {
            Some(EnvRoot::ImportMeta)
        }
        _ => None,
    }
}

/// `import.meta`, as opposed to `new.target`.
fn is_import_meta(node: Node) -> bool {
    let mut cursor = node.walk();
    let mut tokens = node.children(&mut cursor).map(|c| c.kind());
    tokens.next() == Some("import") && tokens.last() == Some("meta")
}

fn node_text<'a>(node: Node, source: &'a [u8]) -> Option<&'a str> {
    node.utf8_text(source).ok()
}

/// Decoded value of a string literal node.
///
/// Built as UTF-16 code units so `\uD83D\uDE00` style surrogate pairs
/// combine; lone surrogates become U+FFFD.
fn string_value(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut units: Vec<u16> = Vec::new();
    let mut cursor = node.walk();
    for part in node.named_children(&mut cursor) {
        let text = node_text(part, source)?;
        match part.kind() {
            "string_fragment" => units.extend(text.encode_utf16()),
            "escape_sequence" => push_escape(&mut units, text),
            _ => {}
        }
    }
    Some(String::from_utf16_lossy(&units))
}

fn push_escape(out: &mut Vec<u16>, escape: &str) {
    let Some(body) = escape.strip_prefix('\\') else {
        out.extend(escape.encode_utf16());
        return;
    };
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return;
    };
    let rest = chars.as_str();

    let simple = match first {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'v' => '\u{b}',
        '0' if rest.is_empty() => '\0',
        // Line continuation
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => return,
        'x' => match u32::from_str_radix(rest, 16).ok().and_then(char::from_u32) {
            Some(c) if rest.len() == 2 => c,
            _ => return out.extend(escape.encode_utf16()),
        },
        'u' => {
            if let Some(hex) = rest.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
                match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                    Some(c) => c,
                    None => return out.extend(escape.encode_utf16()),
                }
            } else {
                // Four digits; may be half of a surrogate pair.
                match u16::from_str_radix(rest, 16) {
                    Ok(unit) if rest.len() == 4 => return out.push(unit),
                    _ => return out.extend(escape.encode_utf16()),
                }
            }
        }
        other => other,
    };
    let mut buf = [0u16; 2];
    out.extend_from_slice(simple.encode_utf16(&mut buf));
}

fn insert_key(keys: &mut KeySet, key: String) {
    if !key.is_empty() {
        keys.insert(key);
    }
}
