use std::fmt::Write;

use camino::Utf8Path;
use lurk_sourcemap::is_virtual_path;
use lurk_sourcemap::SourceCodeType;
use serde_json::Value;

use crate::SourceCode;
use crate::WorkspaceFileResolver;

impl WorkspaceFileResolver {
    /// Source of a module for the type checker, from its open buffer or the
    /// disk. `.json` modules come back as a Luau table.
    #[must_use]
    pub fn read_source(&self, name: &str) -> Option<SourceCode> {
        let (path, kind) = if is_virtual_path(name) {
            let index = self.sourcemap();
            let node = index.node_for_virtual_path(name)?;
            let kind = node.source_code_type()?;
            (node.real_path()?.to_path_buf(), kind)
        } else {
            let path = self.absolute(Utf8Path::new(name));
            let kind = SourceCodeType::from_path(&path);
            (path, kind)
        };

        let source = {
            let document = self.text_document_for_path(&path)?;
            if path.extension() == Some("json") {
                match json_to_luau(document.content()) {
                    Ok(source) => source,
                    Err(err) => {
                        tracing::warn!(%path, "failed to convert json module: {err}");
                        return None;
                    }
                }
            } else {
                document.content().to_string()
            }
        };

        Some(SourceCode {
            source,
            kind,
            display_name: self.human_readable_name(name),
        })
    }

    /// Name to show the user: virtual paths as they are, files relative to
    /// the workspace root when they are inside it.
    #[must_use]
    pub fn human_readable_name(&self, name: &str) -> String {
        if is_virtual_path(name) {
            return name.to_string();
        }
        let path = self.absolute(Utf8Path::new(name));
        lurk_source::relative_to(&path, self.root())
            .map_or_else(|| path.to_string(), ToString::to_string)
    }
}

/// Turn a JSON document into a strict Luau module returning the same data.
pub fn json_to_luau(json: &str) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    let mut out = String::from("--!strict\nreturn ");
    write_value(&mut out, &value);
    out.push('\n');
    Ok(out)
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("nil"),
        Value::Bool(value) => {
            let _ = write!(out, "{value}");
        }
        Value::Number(number) => {
            let _ = write!(out, "{number}");
        }
        Value::String(text) => write_string(out, text),
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{ ");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push_str(" }");
        }
        Value::Object(fields) => {
            if fields.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{ ");
            for (i, (key, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('[');
                write_string(out, key);
                out.push_str("] = ");
                write_value(out, item);
            }
            out.push_str(" }");
        }
    }
}

fn write_string(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
