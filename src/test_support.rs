//! Fixtures shared by the unit tests

use std::path::{Path, PathBuf};

/// Single textured triangle referencing `tri.mtl`
pub const TRIANGLE_OBJ: &str = "\
mtllib tri.mtl
o tri
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 2.0 -1.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
usemtl red
f 1/1 2/2 3/3
";

pub const TRIANGLE_MTL: &str = "\
newmtl red
Kd 1.0 0.5 0.25
Ns 64.0
map_Kd tri.png
";

/// Same triangle with a material that names no texture
pub const UNTEXTURED_MTL: &str = "\
newmtl red
Kd 1.0 0.5 0.25
Ns 64.0
";

/// Geometry file the importer rejects
pub const BROKEN_OBJ: &str = "\
o broken
v 0.0 oops 0.0
f 1 1 1
";

/// Scratch asset tree in a temporary directory, removed on drop
pub struct AssetDir {
    dir: tempfile::TempDir,
}

impl AssetDir {
    pub fn new(prefix: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("scene3d-{}-", prefix))
            .tempdir()
            .unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a file relative to the directory, creating parents as needed
    pub fn write(&self, relative: impl AsRef<Path>, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Writes a small solid PNG
    pub fn write_png(&self, relative: impl AsRef<Path>, color: [u8; 4]) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        image::RgbaImage::from_pixel(2, 2, image::Rgba(color))
            .save(&path)
            .unwrap();
        path
    }

    /// Lays out `<root>/models/<name>/<name>.obj` with the triangle fixture,
    /// optionally with its texture present
    pub fn write_triangle_model(&self, name: &str, with_texture: bool) {
        let dir = Path::new("models").join(name);
        self.write(dir.join(format!("{}.obj", name)), TRIANGLE_OBJ);
        self.write(dir.join("tri.mtl"), TRIANGLE_MTL);
        if with_texture {
            self.write_png(dir.join("tri.png"), [200, 10, 10, 255]);
        }
    }

    pub fn models_dir(&self) -> PathBuf {
        self.path().join("models")
    }
}
