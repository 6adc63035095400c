//! Importers command implementation

use colored::Colorize;

use super::Workspace;
use crate::index::ROOT_PACKAGE;
use crate::LensError;

type Result<T> = std::result::Result<T, LensError>;

/// Execute the importers command
///
/// # Errors
/// Returns `LensError::InvalidInput` if `package` is not an indexed package
/// directory.
pub fn execute(ws: &Workspace, package: &str, quiet: bool) -> Result<()> {
    let dir = normalize(package);
    let Some(info) = ws.index().package(&dir) else {
        return Err(LensError::InvalidInput(format!(
            "No indexed package at '{package}'"
        )));
    };

    let importers = ws.index().importers_of(&info.dir);
    if quiet {
        for path in importers {
            println!("{path}");
        }
        return Ok(());
    }

    println!(
        "{} {} ({} file(s), {} symbol(s))",
        "Package".bold(),
        info.dir.cyan(),
        info.files.len(),
        info.symbols.len()
    );
    if importers.is_empty() {
        println!("  No importers");
    }
    for path in importers {
        println!("  {}", path.green());
    }
    Ok(())
}

/// Strip `./` and trailing slashes; an empty result is the root package
fn normalize(package: &str) -> String {
    let trimmed = package
        .trim()
        .trim_start_matches("./")
        .trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT_PACKAGE.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LensConfig;
    use crate::testing::TestTree;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("./shield/"), "shield");
        assert_eq!(normalize("./"), ".");
        assert_eq!(normalize("."), ".");
        assert_eq!(normalize("core/render"), "core/render");
    }

    #[test]
    fn test_unknown_package_is_rejected() {
        let tree = TestTree::new();
        tree.write("main.go", "package main\n");
        let ws = Workspace::open(tree.root(), LensConfig::default()).unwrap();

        assert!(execute(&ws, ".", true).is_ok());
        assert!(matches!(
            execute(&ws, "missing", true),
            Err(LensError::InvalidInput(_))
        ));
    }
}
