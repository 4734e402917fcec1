use std::{
    fmt,
    fs::read_dir,
    path::{Path, PathBuf},
    sync::Arc,
};

use ab_glyph::FontArc;
use tracing::{info, warn};

use crate::error::SceneResult;

pub struct FontFace {
    pub name: String,
    pub path: PathBuf,
    pub font: FontArc,
}

/// Fonts found under a directory tree, loaded once and shared between clones.
#[derive(Clone)]
pub struct FontPool {
    root: PathBuf,
    faces: Arc<[FontFace]>,
}

impl FontPool {
    /// Walks `root` recursively and keeps every `.ttf`/`.otf` file that parses.
    pub fn scan(root: impl AsRef<Path>) -> SceneResult<Self> {
        let root = root.as_ref().to_path_buf();
        let mut files = Vec::new();
        collect_font_files(&root, &mut files)?;

        let faces: Vec<FontFace> = files.into_iter().filter_map(load_face).collect();
        info!(root = %root.display(), fonts = faces.len(), "font pool loaded");
        Ok(Self {
            root,
            faces: faces.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&FontFace> {
        self.faces.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontFace> {
        self.faces.iter()
    }
}

impl fmt::Debug for FontPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontPool")
            .field("root", &self.root)
            .field("faces", &self.faces.iter().map(|f| &f.name).collect::<Vec<_>>())
            .finish()
    }
}

// Directory entries are visited in sorted order so pool indices are stable.
fn collect_font_files(dir: &Path, out: &mut Vec<PathBuf>) -> SceneResult<()> {
    let mut entries: Vec<PathBuf> = read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_font_files(&path, out)?;
        } else if matches!(
            path.extension()
                .and_then(|s| s.to_str())
                .map(str::to_ascii_lowercase)
                .as_deref(),
            Some("ttf") | Some("otf")
        ) {
            out.push(path);
        }
    }
    Ok(())
}

fn load_face(path: PathBuf) -> Option<FontFace> {
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable font");
            return None;
        }
    };
    let name = full_name(&bytes).unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    match FontArc::try_from_vec(bytes) {
        Ok(font) => Some(FontFace { name, path, font }),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unparsable font");
            None
        }
    }
}

fn full_name(bytes: &[u8]) -> Option<String> {
    let face = ttf_parser::Face::parse(bytes, 0).ok()?;
    face.names()
        .into_iter()
        .filter(|n| n.name_id == ttf_parser::name_id::FULL_NAME)
        .find_map(|n| n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_fonts_are_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("family/regular");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("broken.ttf"), b"definitely not a font").unwrap();
        std::fs::write(tmp.path().join("readme.md"), b"fonts").unwrap();

        let pool = FontPool::scan(tmp.path()).unwrap();
        assert!(pool.is_empty());
        assert_eq!(pool.root(), tmp.path());
    }

    #[test]
    fn walks_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("x.TTF"), b"x").unwrap();
        std::fs::write(tmp.path().join("y.otf"), b"y").unwrap();
        std::fs::write(tmp.path().join("z.woff"), b"z").unwrap();

        let mut files = Vec::new();
        collect_font_files(tmp.path(), &mut files).unwrap();
        assert_eq!(files, [nested.join("x.TTF"), tmp.path().join("y.otf")]);
    }

    #[test]
    fn parsable_fonts_are_kept() {
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts");
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("mono");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::copy(fixture.join("DejaVuSansMono.ttf"), nested.join("DejaVuSansMono.ttf")).unwrap();
        std::fs::write(tmp.path().join("broken.otf"), b"not a font either").unwrap();

        let pool = FontPool::scan(tmp.path()).unwrap();
        assert_eq!(pool.len(), 1);
        let face = pool.get(0).unwrap();
        assert!(face.name.contains("DejaVu"), "{}", face.name);
        assert_eq!(face.path, nested.join("DejaVuSansMono.ttf"));
    }

    #[test]
    fn unreadable_font_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_face(tmp.path().join("gone.ttf")).is_none());
    }
}
