/*!
 * Tree rendering of a directory
 *
 * Prints a directory as an indented tree with box-drawing connectors,
 * subdirectories before files at every level:
 *
 * ```text
 * destination
 * ├── jpg
 * │   └── photo.jpg
 * └── txt
 *     ├── data.txt
 *     └── report.txt
 * ```
 */

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use colored::{Color, Colorize};

use crate::error::{ExtCopyError, Result};

const BRANCH: &str = "├── ";
const LAST: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// How directory names are decorated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    /// Color for directory names, `None` for plain text
    pub directory_color: Option<Color>,
}

impl RenderStyle {
    /// No escape codes at all
    pub fn plain() -> Self {
        Self {
            directory_color: None,
        }
    }

    /// Bright blue directories
    pub fn colored() -> Self {
        Self {
            directory_color: Some(Color::BrightBlue),
        }
    }

    fn directory(&self, name: &str) -> String {
        match self.directory_color {
            Some(color) => name.color(color).to_string(),
            None => name.to_string(),
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::colored()
    }
}

/// Renders a directory as a tree
pub struct TreeRenderer {
    style: RenderStyle,
}

impl TreeRenderer {
    /// Create a new renderer
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    /// Write the tree rooted at `root` to `out`.
    ///
    /// Any I/O error is fatal and returned as [`ExtCopyError::Render`].
    pub fn render<W: Write>(&self, root: &Path, out: &mut W) -> Result<()> {
        let metadata = fs::metadata(root).map_err(|source| render_error(root, source))?;

        let name = display_name(root);
        if metadata.is_dir() {
            writeln!(out, "{}", self.style.directory(&name))
                .map_err(|source| render_error(root, source))?;
            self.render_children(root, "", out)
        } else {
            writeln!(out, "{}", name).map_err(|source| render_error(root, source))
        }
    }

    /// Render into a string
    pub fn render_to_string(&self, root: &Path) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(root, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn render_children<W: Write>(&self, dir: &Path, indent: &str, out: &mut W) -> Result<()> {
        let children = sorted_children(dir)?;
        let count = children.len();

        for (index, (path, is_dir)) in children.into_iter().enumerate() {
            let is_last = index + 1 == count;
            let connector = if is_last { LAST } else { BRANCH };
            let name = display_name(&path);

            let line = if is_dir {
                self.style.directory(&name)
            } else {
                name
            };
            writeln!(out, "{}{}{}", indent, connector, line)
                .map_err(|source| render_error(&path, source))?;

            if is_dir {
                let child_indent = format!("{}{}", indent, if is_last { SPACE } else { PIPE });
                self.render_children(&path, &child_indent, out)?;
            }
        }

        Ok(())
    }
}

/// Children of `dir` with directories first, then by name
fn sorted_children(dir: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| render_error(dir, source))? {
        let entry = entry.map_err(|source| render_error(dir, source))?;
        let is_dir = entry
            .file_type()
            .map_err(|source| render_error(&entry.path(), source))?
            .is_dir();
        children.push((entry.path(), is_dir));
    }

    children.sort_by(|(a, a_dir), (b, b_dir)| {
        b_dir
            .cmp(a_dir)
            .then_with(|| a.file_name().cmp(&b.file_name()))
    });
    Ok(children)
}

fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

fn render_error(path: &Path, source: io::Error) -> ExtCopyError {
    ExtCopyError::Render {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn test_directories_before_files() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("root");
        fs::create_dir_all(root.join("zdir").join("inner")).unwrap();
        fs::create_dir_all(root.join("adir")).unwrap();
        fs::write(root.join("afile.txt"), "a").unwrap();
        fs::write(root.join("zdir").join("z.txt"), "z").unwrap();

        let output = TreeRenderer::new(RenderStyle::plain())
            .render_to_string(&root)
            .unwrap();

        let expected = "\
root
├── adir
├── zdir
│   ├── inner
│   └── z.txt
└── afile.txt
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_one_last_connector_per_level() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("dest");
        for bucket in ["txt", "jpg", "no_extension"] {
            fs::create_dir_all(root.join(bucket)).unwrap();
        }
        fs::write(root.join("txt").join("a.txt"), "").unwrap();
        fs::write(root.join("txt").join("b.txt"), "").unwrap();
        fs::write(root.join("jpg").join("photo.jpg"), "").unwrap();

        let output = TreeRenderer::new(RenderStyle::plain())
            .render_to_string(&root)
            .unwrap();
        let lines: Vec<&str> = output.lines().collect();

        // Top level: three buckets, only the final one uses the last glyph
        let top: Vec<&&str> = lines
            .iter()
            .filter(|l| l.starts_with(BRANCH) || l.starts_with(LAST))
            .collect();
        assert_eq!(top.len(), 3);
        assert_eq!(top.iter().filter(|l| l.starts_with(LAST)).count(), 1);
        assert_eq!(*top[2], "└── txt");

        assert!(lines.contains(&"│   └── photo.jpg"));
        assert!(lines.contains(&"    ├── a.txt"));
        assert!(lines.contains(&"    └── b.txt"));
    }

    #[test]
    fn test_colored_style_decorates_directories_only() {
        colored::control::set_override(true);
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("dest");
        fs::create_dir_all(root.join("txt")).unwrap();
        fs::write(root.join("txt").join("a.txt"), "").unwrap();

        let output = TreeRenderer::new(RenderStyle::colored())
            .render_to_string(&root)
            .unwrap();
        colored::control::unset_override();

        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("\u{1b}["));
        assert!(lines[1].contains("\u{1b}["));
        assert_eq!(lines[2], "    └── a.txt");
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing");

        let err = TreeRenderer::new(RenderStyle::plain())
            .render_to_string(&missing)
            .unwrap_err();

        assert!(matches!(err, ExtCopyError::Render { .. }));
        assert_eq!(err.path(), Some(missing.as_path()));
    }
}
