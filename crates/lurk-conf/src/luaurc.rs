//! Per-directory `.luaurc` analysis configuration.
//!
//! A `.luaurc` only lists the fields it wants to change. [`LuauConfigFile`]
//! is that partial view; [`LuauConfig`] is the effective configuration after
//! every file from the workspace root down to a directory has been applied.

use std::collections::BTreeMap;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use serde::Deserialize;
use serde::Serialize;

use crate::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".luaurc";

/// Type checking mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    NoCheck,
    #[default]
    NonStrict,
    Strict,
}

/// Lint toggles by lint name, with `*` as the fallback for unlisted lints.
pub type LintOptions = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LuauConfig {
    pub mode: Mode,
    pub lint: LintOptions,
    pub lint_errors: bool,
    pub type_errors: bool,
    pub globals: Vec<String>,
    /// Alias name (without `@`) to an absolute directory.
    pub aliases: BTreeMap<String, Utf8PathBuf>,
}

impl Default for LuauConfig {
    fn default() -> Self {
        Self {
            mode: Mode::NonStrict,
            lint: LintOptions::new(),
            lint_errors: false,
            type_errors: true,
            globals: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }
}

impl LuauConfig {
    #[must_use]
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Layer a `.luaurc` found in `dir` on top of this configuration.
    ///
    /// Scalars present in the file replace the current value. `lint` and
    /// `aliases` are merged key by key with the file winning, `globals` are
    /// appended when not already declared. Relative alias targets are
    /// resolved against `dir`.
    pub fn apply(&mut self, file: LuauConfigFile, dir: &Utf8Path) {
        if let Some(mode) = file.language_mode {
            self.mode = mode;
        }
        if let Some(lint_errors) = file.lint_errors {
            self.lint_errors = lint_errors;
        }
        if let Some(type_errors) = file.type_errors {
            self.type_errors = type_errors;
        }
        if let Some(lint) = file.lint {
            self.lint.extend(lint);
        }
        for global in file.globals.into_iter().flatten() {
            if !self.globals.contains(&global) {
                self.globals.push(global);
            }
        }
        for (name, target) in file.aliases.into_iter().flatten() {
            let target = lurk_source::expand_home(&target);
            let target = if target.is_absolute() {
                target
            } else {
                dir.join(target)
            };
            self.aliases
                .insert(name, lurk_source::normalize_path(&target));
        }
    }

    #[must_use]
    pub fn is_lint_enabled(&self, name: &str) -> bool {
        self.lint
            .get(name)
            .or_else(|| self.lint.get("*"))
            .copied()
            .unwrap_or(true)
    }

    /// Aliases in the form require strings use them, `@name` to directory.
    #[must_use]
    pub fn directory_aliases(&self) -> BTreeMap<String, String> {
        self.aliases
            .iter()
            .map(|(name, target)| (format!("@{name}"), target.to_string()))
            .collect()
    }
}

/// The fields one `.luaurc` file sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LuauConfigFile {
    pub language_mode: Option<Mode>,
    pub lint: Option<LintOptions>,
    pub lint_errors: Option<bool>,
    pub type_errors: Option<bool>,
    pub globals: Option<Vec<String>>,
    pub aliases: Option<BTreeMap<String, String>>,
}

impl LuauConfigFile {
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse {
        use super::*;

        #[test]
        fn test_parse_full_file() {
            let file = LuauConfigFile::parse(
                r#"{
                    "languageMode": "strict",
                    "lint": { "*": false, "LocalShadow": true },
                    "lintErrors": true,
                    "typeErrors": false,
                    "globals": ["warn"],
                    "aliases": { "pkg": "Packages" }
                }"#,
            )
            .unwrap();

            assert_eq!(file.language_mode, Some(Mode::Strict));
            assert_eq!(file.lint_errors, Some(true));
            assert_eq!(file.type_errors, Some(false));
            assert_eq!(file.globals, Some(vec!["warn".to_string()]));
            assert_eq!(file.lint.unwrap().get("LocalShadow"), Some(&true));
        }

        #[test]
        fn test_parse_empty_file() {
            assert_eq!(LuauConfigFile::parse("  \n").unwrap(), LuauConfigFile::default());
        }

        #[test]
        fn test_unknown_key_is_an_error() {
            let result = LuauConfigFile::parse(r#"{ "languageMod": "strict" }"#);
            assert!(matches!(result, Err(ConfigError::Luaurc(_))));
        }

        #[test]
        fn test_unknown_mode_is_an_error() {
            assert!(LuauConfigFile::parse(r#"{ "languageMode": "pedantic" }"#).is_err());
        }

        #[test]
        fn test_all_modes() {
            for (text, mode) in [
                ("nocheck", Mode::NoCheck),
                ("nonstrict", Mode::NonStrict),
                ("strict", Mode::Strict),
            ] {
                let file = LuauConfigFile::parse(&format!(r#"{{ "languageMode": "{text}" }}"#))
                    .unwrap();
                assert_eq!(file.language_mode, Some(mode));
            }
        }
    }

    mod apply {
        use super::*;

        #[test]
        fn test_default_is_nonstrict() {
            let config = LuauConfig::default();
            assert_eq!(config.mode, Mode::NonStrict);
            assert!(config.type_errors);
            assert!(!config.lint_errors);
        }

        #[test]
        fn test_absent_fields_keep_parent_values() {
            let mut config = LuauConfig::with_mode(Mode::Strict);
            config.globals.push("warn".to_string());

            config.apply(
                LuauConfigFile {
                    lint_errors: Some(true),
                    ..LuauConfigFile::default()
                },
                Utf8Path::new("/proj/src"),
            );

            assert_eq!(config.mode, Mode::Strict);
            assert!(config.lint_errors);
            assert_eq!(config.globals, vec!["warn".to_string()]);
        }

        #[test]
        fn test_child_scalars_override() {
            let mut config = LuauConfig::with_mode(Mode::Strict);
            config.apply(
                LuauConfigFile {
                    language_mode: Some(Mode::NoCheck),
                    ..LuauConfigFile::default()
                },
                Utf8Path::new("/proj"),
            );
            assert_eq!(config.mode, Mode::NoCheck);
        }

        #[test]
        fn test_collections_union_with_child_precedence() {
            let mut config = LuauConfig::default();
            config.apply(
                LuauConfigFile::parse(
                    r#"{ "lint": { "A": true, "B": true }, "globals": ["x"], "aliases": { "pkg": "Packages", "lib": "lib" } }"#,
                )
                .unwrap(),
                Utf8Path::new("/proj"),
            );
            config.apply(
                LuauConfigFile::parse(
                    r#"{ "lint": { "B": false }, "globals": ["x", "y"], "aliases": { "pkg": "../vendor" } }"#,
                )
                .unwrap(),
                Utf8Path::new("/proj/src"),
            );

            assert!(config.is_lint_enabled("A"));
            assert!(!config.is_lint_enabled("B"));
            assert_eq!(config.globals, vec!["x".to_string(), "y".to_string()]);
            assert_eq!(config.aliases["pkg"], Utf8PathBuf::from("/proj/vendor"));
            assert_eq!(config.aliases["lib"], Utf8PathBuf::from("/proj/lib"));
        }

        #[test]
        fn test_lint_wildcard() {
            let mut config = LuauConfig::default();
            config
                .lint
                .extend([("*".to_string(), false), ("Unused".to_string(), true)]);
            assert!(config.is_lint_enabled("Unused"));
            assert!(!config.is_lint_enabled("LocalShadow"));
        }

        #[test]
        fn test_directory_aliases_are_prefixed() {
            let mut config = LuauConfig::default();
            config.apply(
                LuauConfigFile::parse(r#"{ "aliases": { "pkg": "/abs/packages" } }"#).unwrap(),
                Utf8Path::new("/proj"),
            );
            assert_eq!(
                config.directory_aliases().get("@pkg").map(String::as_str),
                Some("/abs/packages")
            );
        }
    }
}
