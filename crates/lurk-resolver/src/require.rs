//! Turning the argument of a `require` call into a module name.
//!
//! String requires are resolved against aliases, the virtual tree and the
//! disk, in that order. Instance expressions such as
//! `script.Parent:WaitForChild("Util")` are evaluated against the virtual
//! tree only.

use std::collections::BTreeMap;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use lurk_source::FileSystem;
use lurk_source::SCRIPT_EXTENSIONS;
use lurk_sourcemap::is_virtual_path;
use lurk_sourcemap::SourceMapIndex;
use lurk_sourcemap::DATA_MODEL_ROOT;

use crate::ModuleInfo;
use crate::WorkspaceFileResolver;

/// The argument of a `require` call, as far as resolution cares about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequireExpr {
    /// A string literal, `require("./util")`.
    String(String),
    /// A bare global, `game` or `script`.
    Global(String),
    /// `base.Name`
    Index { base: Box<RequireExpr>, name: String },
    /// `base["Name"]`
    IndexString { base: Box<RequireExpr>, key: String },
    /// `base:Method(args)`
    MethodCall {
        base: Box<RequireExpr>,
        method: String,
        args: Vec<RequireExpr>,
    },
    /// Anything computed at runtime.
    Other,
}

impl RequireExpr {
    #[must_use]
    pub fn string(literal: impl Into<String>) -> Self {
        Self::String(literal.into())
    }

    #[must_use]
    pub fn global(name: impl Into<String>) -> Self {
        Self::Global(name.into())
    }

    #[must_use]
    pub fn index(self, name: impl Into<String>) -> Self {
        Self::Index {
            base: Box::new(self),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn index_string(self, key: impl Into<String>) -> Self {
        Self::IndexString {
            base: Box::new(self),
            key: key.into(),
        }
    }

    #[must_use]
    pub fn call(self, method: impl Into<String>, args: impl IntoIterator<Item = RequireExpr>) -> Self {
        Self::MethodCall {
            base: Box::new(self),
            method: method.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Parse an instance path written the way it appears in source, e.g.
    /// `script.Parent["Util"]` or `game:GetService("ReplicatedStorage").Shared`.
    ///
    /// Only `game` and `script` roots, `.Name`, `["Name"]` and method calls
    /// with string arguments are understood. Returns `None` for anything else.
    #[must_use]
    pub fn parse_instance_path(input: &str) -> Option<Self> {
        let mut parser = InstancePathParser { rest: input.trim() };
        let root = parser.identifier()?;
        if root != "game" && root != "script" {
            return None;
        }
        let mut expr = Self::global(root);

        while !parser.rest.is_empty() {
            if parser.eat('.') {
                expr = expr.index(parser.identifier()?);
            } else if parser.eat('[') {
                let key = parser.string()?;
                parser.expect(']')?;
                expr = expr.index_string(key);
            } else if parser.eat(':') {
                let method = parser.identifier()?;
                parser.expect('(')?;
                let mut args = Vec::new();
                while !parser.eat(')') {
                    if !args.is_empty() {
                        parser.expect(',')?;
                    }
                    args.push(Self::String(parser.string()?));
                }
                expr = expr.call(method, args);
            } else {
                return None;
            }
        }

        Some(expr)
    }
}

struct InstancePathParser<'a> {
    rest: &'a str,
}

impl<'a> InstancePathParser<'a> {
    fn eat(&mut self, token: char) -> bool {
        match self.rest.trim_start().strip_prefix(token) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn expect(&mut self, token: char) -> Option<()> {
        self.eat(token).then_some(())
    }

    fn identifier(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start();
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if end == 0 || rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let (identifier, rest) = rest.split_at(end);
        self.rest = rest;
        Some(identifier)
    }

    fn string(&mut self) -> Option<String> {
        let rest = self.rest.trim_start();
        let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let body = &rest[1..];
        let end = body.find(quote)?;
        self.rest = &body[end + 1..];
        Some(body[..end].to_string())
    }
}

/// Substitute a directory alias at the start of `input`.
///
/// The alias must be followed by a separator or the end of `input`, and the
/// longest matching alias wins. A relative target is taken relative to
/// `root`, `~` expands to the home directory. Pure string manipulation: the
/// result may not exist.
#[must_use]
pub fn resolve_directory_alias(
    root: &Utf8Path,
    aliases: &BTreeMap<String, String>,
    input: &str,
) -> Option<Utf8PathBuf> {
    let (alias, target) = aliases
        .iter()
        .filter(|(alias, _)| !alias.is_empty())
        .filter(|(alias, _)| {
            input.strip_prefix(alias.as_str()).is_some_and(|rest| {
                rest.is_empty() || rest.starts_with(['/', '\\']) || alias.ends_with(['/', '\\'])
            })
        })
        .max_by_key(|(alias, _)| alias.len())?;

    let remainder = input[alias.len()..].trim_start_matches(['/', '\\']);
    let target = lurk_source::expand_home(target);
    let target = if target.is_absolute() {
        target
    } else {
        root.join(target)
    };

    Some(lurk_source::normalize_path(&target.join(remainder)))
}

/// Where an instance expression has got to so far.
struct InstancePath {
    path: String,
    optional: bool,
}

impl InstancePath {
    fn child(self, name: &str) -> Self {
        Self {
            path: format!("{}/{name}", self.path),
            optional: self.optional,
        }
    }
}

impl WorkspaceFileResolver {
    /// Resolve a require in the module `context`.
    ///
    /// `None` means "no such module", which the caller reports as a
    /// diagnostic.
    #[must_use]
    pub fn resolve_require(&self, context: Option<&ModuleInfo>, expr: &RequireExpr) -> Option<ModuleInfo> {
        match expr {
            RequireExpr::String(literal) => self.resolve_string_require(context, literal),
            RequireExpr::Other => {
                tracing::debug!("dynamic require cannot be resolved statically");
                None
            }
            _ => self.resolve_instance_require(context, expr),
        }
    }

    #[must_use]
    pub fn resolve_string_require(&self, context: Option<&ModuleInfo>, literal: &str) -> Option<ModuleInfo> {
        let settings = self.settings();

        if let Some(target) = settings.require.file_aliases.get(literal) {
            let path = self.absolute(&lurk_source::expand_home(target));
            return self.module_for_file(&path, literal);
        }

        let mut aliases = settings.require.directory_aliases.clone();
        if let Some(context) = context {
            aliases.extend(self.get_config(&context.name).directory_aliases());
        }
        if let Some(path) = resolve_directory_alias(self.root(), &aliases, literal) {
            return self.module_for_file(&path, literal);
        }

        if is_virtual_path(literal) {
            return self
                .sourcemap()
                .node_for_virtual_path(literal)
                .map(|node| ModuleInfo::new(node.virtual_path()));
        }

        if let Some(context) = context.filter(|context| is_virtual_path(&context.name)) {
            let index = self.sourcemap();
            if let Some(name) = resolve_virtual_relative(&index, &context.name, literal) {
                return Some(ModuleInfo::new(name));
            }
            if self.resolve_to_real_path(&context.name).is_none() {
                tracing::debug!(context = %context.name, literal, "no such module in the virtual tree");
                return None;
            }
        }

        let base = self.require_base_path(context.map(|context| context.name.as_str()));
        let candidate = lurk_source::normalize_path(&base.join(literal));
        self.module_for_file(&candidate, literal)
    }

    fn module_for_file(&self, candidate: &Utf8Path, literal: &str) -> Option<ModuleInfo> {
        let Some(path) = self.find_module_file(candidate) else {
            tracing::debug!(%candidate, literal, "no module file for require");
            return None;
        };
        Some(ModuleInfo::new(self.module_name_for_path(&path)))
    }

    /// The file a require of `candidate` loads: the file itself, an `init`
    /// file inside a directory, or the path with a script extension added.
    /// Open buffers count as files.
    pub(crate) fn find_module_file(&self, candidate: &Utf8Path) -> Option<Utf8PathBuf> {
        let fs = self.file_system();
        if fs.is_file(candidate) {
            return Some(candidate.to_path_buf());
        }
        if fs.is_dir(candidate) {
            if let Some(init) = SCRIPT_EXTENSIONS
                .iter()
                .map(|ext| candidate.join(format!("init.{ext}")))
                .find(|init| fs.is_file(init))
            {
                return Some(init);
            }
        }
        SCRIPT_EXTENSIONS
            .iter()
            .map(|ext| Utf8PathBuf::from(format!("{candidate}.{ext}")))
            .find(|path| fs.is_file(path))
    }

    fn resolve_instance_require(&self, context: Option<&ModuleInfo>, expr: &RequireExpr) -> Option<ModuleInfo> {
        let index = self.sourcemap();
        let context_path = context.and_then(|context| self.resolve_to_virtual_path(&context.name));
        let resolved = evaluate_instance(&index, context_path.as_deref(), expr)?;

        match index.node_for_virtual_path(&resolved.path) {
            Some(node) => Some(ModuleInfo {
                name: node.virtual_path().to_string(),
                optional: resolved.optional,
            }),
            None => {
                tracing::debug!(path = %resolved.path, "instance require names no sourcemap node");
                None
            }
        }
    }
}

/// Walk a relative require through the virtual tree from `context`.
fn resolve_virtual_relative(index: &SourceMapIndex, context: &str, literal: &str) -> Option<String> {
    let node = index.node_for_virtual_path(context)?;
    let mut current = if node.is_directory_like() {
        node
    } else {
        index.parent(node)?
    };

    let literal = SCRIPT_EXTENSIONS
        .iter()
        .find_map(|ext| literal.strip_suffix(&format!(".{ext}")))
        .unwrap_or(literal);

    for segment in literal.split(['/', '\\']) {
        current = match segment {
            "" | "." => current,
            ".." => index.parent(current)?,
            name => index.children(current).find(|child| child.name() == name)?,
        };
    }

    Some(current.virtual_path().to_string())
}

fn evaluate_instance(index: &SourceMapIndex, context: Option<&str>, expr: &RequireExpr) -> Option<InstancePath> {
    match expr {
        RequireExpr::Global(name) => {
            let path = match name.as_str() {
                "game" => DATA_MODEL_ROOT.to_string(),
                "script" => context?.to_string(),
                _ => return None,
            };
            Some(InstancePath {
                path,
                optional: false,
            })
        }
        RequireExpr::Index { base, name } => {
            let base = evaluate_instance(index, context, base)?;
            if name == "Parent" {
                let (parent, _) = base.path.rsplit_once('/')?;
                Some(InstancePath {
                    path: parent.to_string(),
                    optional: base.optional,
                })
            } else {
                Some(base.child(name))
            }
        }
        RequireExpr::IndexString { base, key } => {
            Some(evaluate_instance(index, context, base)?.child(key))
        }
        RequireExpr::MethodCall { base, method, args } => {
            let base = evaluate_instance(index, context, base)?;
            let name = match args.as_slice() {
                [RequireExpr::String(name)] | [RequireExpr::String(name), _] => name,
                _ => return None,
            };
            match method.as_str() {
                "GetService" if base.path == DATA_MODEL_ROOT => Some(base.child(name)),
                "WaitForChild" => Some(base.child(name)),
                "FindFirstChild" => {
                    let mut child = base.child(name);
                    child.optional = true;
                    Some(child)
                }
                "FindFirstAncestor" => {
                    let node = index.node_for_virtual_path(&base.path)?;
                    let ancestor = index.ancestor_named(node, name)?;
                    Some(InstancePath {
                        path: ancestor.virtual_path().to_string(),
                        optional: base.optional,
                    })
                }
                _ => None,
            }
        }
        RequireExpr::String(_) | RequireExpr::Other => None,
    }
}
