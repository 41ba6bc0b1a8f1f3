use std::collections::BTreeMap;
use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use lurk_conf::Mode;
use lurk_conf::Settings;
use lurk_resolver::resolve_directory_alias;
use lurk_resolver::ConfigResolver;
use lurk_resolver::FileResolver;
use lurk_resolver::ModuleInfo;
use lurk_resolver::RequireExpr;
use lurk_resolver::Workspace;
use lurk_resolver::WorkspaceFileResolver;
use lurk_source::InMemoryFileSystem;
use lurk_source::OsFileSystem;
use lurk_sourcemap::SourceNode;
use lurk_workspace::LanguageId;
use url::Url;

fn shared_project() -> InMemoryFileSystem {
    InMemoryFileSystem::new()
        .with_file("/proj/src/Shared/foo.lua", "return { name = 'foo' }")
        .with_file("/proj/src/Shared/bar.lua", "return require(script.Parent.foo)")
        .with_file("/proj/.luaurc", r#"{ "languageMode": "strict" }"#)
        .with_file("/proj/src/a/b/c/leaf.luau", "return nil")
        .with_file("/proj/packages/util.luau", "return {}")
}

fn shared_tree() -> SourceNode {
    SourceNode::new("Game", "DataModel").with_child(
        SourceNode::new("Shared", "Folder")
            .with_file("src/Shared")
            .with_child(SourceNode::new("foo", "ModuleScript").with_file("src/Shared/foo.lua"))
            .with_child(SourceNode::new("bar", "ModuleScript").with_file("src/Shared/bar.lua")),
    )
}

fn workspace() -> Workspace {
    let workspace = Workspace::new(
        Utf8Path::new("/proj"),
        Settings::default(),
        Arc::new(shared_project()),
    );
    workspace.resolver().set_source_tree(&shared_tree());
    workspace
}

#[test]
fn test_module_name_and_relative_require_in_virtual_tree() {
    let resolver = workspace().resolver();

    let uri = Url::from_file_path("/proj/src/Shared/foo.lua").unwrap();
    assert_eq!(resolver.module_name_for_url(&uri), "game/Shared/foo");

    let module = resolver.resolve_module(
        Some(&ModuleInfo::new("game/Shared")),
        &RequireExpr::string("./foo"),
    );
    assert_eq!(module, Some(ModuleInfo::new("game/Shared/foo")));
}

#[test]
fn test_strict_mode_inherited_from_root() {
    let resolver = workspace().resolver();
    let config = resolver.get_config("/proj/src/a/b/c/leaf.luau");
    assert_eq!(config.mode, Mode::Strict);
}

#[test]
fn test_directory_alias_substitution() {
    let aliases = BTreeMap::from([("@pkg".to_string(), "/proj/packages".to_string())]);
    assert_eq!(
        resolve_directory_alias(Utf8Path::new("/proj"), &aliases, "@pkg/util"),
        Some(Utf8PathBuf::from("/proj/packages/util"))
    );
}

#[test]
fn test_round_trip_between_namespaces() {
    let resolver = workspace().resolver();
    let index = resolver.sourcemap();

    for node in index.iter() {
        let Some(real) = node.real_path() else {
            continue;
        };
        let virtual_path = resolver.resolve_to_virtual_path(real.as_str()).unwrap();
        assert_eq!(virtual_path, node.virtual_path());
        assert_eq!(resolver.resolve_to_real_path(&virtual_path).as_deref(), Some(real));
    }
}

#[test]
fn test_rebuild_replaces_every_entry() {
    let resolver = workspace().resolver();
    assert_eq!(resolver.sourcemap().len(), 4);

    resolver.set_source_tree(
        &SourceNode::new("Game", "DataModel")
            .with_child(SourceNode::new("Client", "Folder").with_file("src/Client")),
    );
    let index = resolver.sourcemap();
    assert_eq!(index.len(), 2);
    assert!(index.node_for_virtual_path("game/Client").is_some());
    assert!(index.node_for_virtual_path("game/Shared").is_none());
    assert!(index
        .node_for_real_path(Utf8Path::new("/proj/src/Shared/foo.lua"))
        .is_none());
}

#[test]
fn test_document_lifecycle() {
    let resolver = workspace().resolver();
    let uri = Url::from_file_path("/proj/src/Shared/foo.lua").unwrap();

    resolver.open_document(&uri, LanguageId::Lua, 1, "return 1".to_string());
    assert_eq!(resolver.text_document(&uri).unwrap().content(), "return 1");
    assert_eq!(
        resolver.read_source("game/Shared/foo").unwrap().source,
        "return 1"
    );

    resolver.change_document(&uri, "return 2".to_string(), None);
    {
        let document = resolver.text_document(&uri).unwrap();
        assert_eq!(document.content(), "return 2");
        assert_eq!(document.version(), 2);
    }

    resolver.close_document(&uri);
    assert!(resolver.text_document(&uri).is_none());
    assert_eq!(
        resolver.read_source("game/Shared/foo").unwrap().source,
        "return { name = 'foo' }"
    );
}

#[test]
fn test_reading_unopened_module_does_not_open_it() {
    let resolver = workspace().resolver();
    let uri = Url::from_file_path("/proj/src/Shared/bar.lua").unwrap();

    let document = resolver.text_document_for_module("game/Shared/bar").unwrap();
    assert!(document.is_temporary());
    assert_eq!(document.content(), "return require(script.Parent.foo)");
    drop(document);

    assert!(resolver.text_document(&uri).is_none());
    assert!(resolver.file_system().buffers().is_empty());
}

#[test]
fn test_one_resolver_behind_both_contracts() {
    let resolver = workspace().resolver();
    let files: Arc<dyn FileResolver> = resolver.clone();
    let configs: Arc<dyn ConfigResolver> = resolver.clone();

    let module = files
        .resolve_module(
            Some(&ModuleInfo::new("game/Shared/bar")),
            &RequireExpr::global("script").index("Parent").index("foo"),
        )
        .unwrap();
    assert_eq!(module.name, "game/Shared/foo");
    assert_eq!(files.human_readable_name(&module.name), "game/Shared/foo");
    assert_eq!(configs.get_config(&module.name).mode, Mode::Strict);

    resolver.clear_sourcemap();
    assert!(files.read_source("game/Shared/foo").is_none());
}

#[test]
fn test_resolver_is_shared_across_threads() {
    let resolver = workspace().resolver();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            std::thread::spawn(move || {
                let uri = Url::from_file_path(format!("/proj/src/scratch{i}.luau")).unwrap();
                resolver.open_document(&uri, LanguageId::Luau, 1, format!("return {i}"));
                let name = resolver.module_name_for_url(&uri);
                let source = resolver.read_source(&name).unwrap().source;
                assert_eq!(source, format!("return {i}"));
                assert_eq!(resolver.get_config(&name).mode, Mode::Strict);
                resolver.set_source_tree(&shared_tree());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(resolver.file_system().buffers().len(), 4);
}

#[test]
fn test_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("src/init.luau"), "return {}").unwrap();
    std::fs::write(root.join("src/util.luau"), "return {}").unwrap();
    std::fs::write(
        root.join("sourcemap.json"),
        r#"{ "name": "Lib", "className": "ModuleScript", "filePaths": ["src/init.luau"],
             "children": [ { "name": "util", "className": "ModuleScript", "filePaths": ["src/util.luau"] } ] }"#,
    )
    .unwrap();

    let workspace = Workspace::load(&root).unwrap();
    let resolver = workspace.resolver();
    let module = resolver
        .resolve_module(
            Some(&ModuleInfo::new("ProjectRoot")),
            &RequireExpr::string("./util"),
        )
        .unwrap();
    assert_eq!(module.name, "ProjectRoot/util");

    let standalone = WorkspaceFileResolver::new(&root, Settings::default(), Arc::new(OsFileSystem));
    assert_eq!(
        standalone.module_name_for_path(&root.join("src/util.luau")),
        root.join("src/util.luau").to_string()
    );
}
