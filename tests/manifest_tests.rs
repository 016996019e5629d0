// Host-side checks that member manifests only inherit dependencies the
// workspace root actually declares.

const ROOT_MANIFEST: &str = include_str!("../Cargo.toml");
const CORE_MANIFEST: &str = include_str!("../crates/mirror-core/Cargo.toml");

/// Lines of the `[name]` table, up to the next table header.
fn table<'a>(manifest: &'a str, name: &str) -> Vec<&'a str> {
    let header = format!("[{}]", name);
    manifest
        .lines()
        .map(str::trim)
        .skip_while(|l| *l != header)
        .skip(1)
        .take_while(|l| !l.starts_with('['))
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect()
}

fn key(line: &str) -> &str {
    line.split('=').next().unwrap_or("").trim()
}

fn inherited(manifest: &str) -> Vec<&str> {
    ["dependencies", "dev-dependencies"]
        .iter()
        .flat_map(|t| table(manifest, t))
        .filter(|l| l.contains("workspace = true"))
        .map(key)
        .collect()
}

#[test]
fn workspace_declares_every_inherited_core_dependency() {
    let declared: Vec<&str> = table(ROOT_MANIFEST, "workspace.dependencies")
        .into_iter()
        .map(key)
        .collect();
    let wanted = inherited(CORE_MANIFEST);
    assert!(!wanted.is_empty());
    for dep in wanted {
        assert!(
            declared.contains(&dep),
            "mirror-core inherits `{dep}` but [workspace.dependencies] lacks it"
        );
    }
}

#[test]
fn core_inherits_its_runtime_stack() {
    let wanted = inherited(CORE_MANIFEST);
    for dep in ["thiserror", "log", "smallvec", "glam"] {
        assert!(wanted.contains(&dep), "mirror-core should inherit `{dep}`");
    }
}

#[test]
fn core_is_a_workspace_member() {
    let members = table(ROOT_MANIFEST, "workspace")
        .into_iter()
        .find(|l| key(l) == "members")
        .unwrap_or("");
    assert!(members.contains("\"crates/mirror-core\""));
}
