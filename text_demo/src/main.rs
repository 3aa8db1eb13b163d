//! Text rendering demo
//!
//! Lays out a paragraph with the font named in a TOML or RON config file and
//! writes the results as PNG files: every glyph atlas page, plus a CPU
//! rendering of the paragraph itself.
//!
//! ```text
//! text_demo <config.toml|config.ron> [output directory] [text...]
//! ```

use std::path::{Path, PathBuf};

use text_engine::config::{Config, ConfigError};
use text_engine::foundation::logging;
use text_engine::foundation::math::{BBox, Vec3};
use text_engine::render::{Canvas, ExportError, SoftwareBackend};
use text_engine::text::{
    Font, FontError, FontLibrary, Layout, PixmapGlyphs, RenderMode, SimpleLayout, TextConfig, TextureGlyphs,
};

const SAMPLE_TEXT: &str = "The quick brown fox jumps over the lazy dog. \
Pack my box with five dozen liquor jugs.\n\
Sphinx of black quartz, judge my vow! Caf\u{e9} \u{4e2d}\u{6587} \u{1f600}";

/// Pixels of empty border around the CPU rendering
const MARGIN: i32 = 8;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("Usage: text_demo <config.toml|config.ron> [output directory] [text...]")]
    Usage,

    #[error("No font_path set in {0}")]
    MissingFont(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Failed to create output directory: {0}")]
    Io(#[from] std::io::Error),
}

struct TextDemo {
    config: TextConfig,
    font_path: PathBuf,
    output_dir: PathBuf,
    text: String,
    library: FontLibrary,
}

impl TextDemo {
    fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, DemoError> {
        let config_path = PathBuf::from(args.next().ok_or(DemoError::Usage)?);
        let config = TextConfig::load_from_file(&config_path)?;
        log::info!("Loaded configuration from {}", config_path.display());

        let font_path = match &config.font.font_path {
            Some(path) if path.is_relative() => config_path.parent().unwrap_or_else(|| Path::new("")).join(path),
            Some(path) => path.clone(),
            None => return Err(DemoError::MissingFont(config_path)),
        };

        let output_dir = args.next().map_or_else(|| PathBuf::from("text_demo_output"), PathBuf::from);
        let words: Vec<String> = args.collect();
        let text = if words.is_empty() {
            SAMPLE_TEXT.to_string()
        } else {
            words.join(" ")
        };

        let library = FontLibrary::with_kerning_cache_size(config.font.kerning_cache_size);
        Ok(Self {
            config,
            font_path,
            output_dir,
            text,
            library,
        })
    }

    fn run(&self) -> Result<(), DemoError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let bounds = self.render_atlas()?;
        self.render_pixmap(&bounds)?;
        Ok(())
    }

    /// Lay out through the glyph atlas and save every atlas page
    fn render_atlas(&self) -> Result<BBox, DemoError> {
        let font_config = &self.config.font;
        let mut backend = SoftwareBackend::default();

        let face = self.library.open_face_from_file(&self.font_path)?;
        let mut font: Font<_, TextureGlyphs<SoftwareBackend>> = Font::new(face, TextureGlyphs::new(font_config.stroke));
        font.set_face_size(&mut backend, font_config.point_size, font_config.resolution)?;

        let mut layout = SimpleLayout::from_config(&self.config.layout);
        let bounds = layout.measure(&mut font, &mut backend, self.text.as_str(), Vec3::zeros());
        let pen = layout.render(&mut font, &mut backend, self.text.as_str(), Vec3::zeros(), RenderMode::FRONT);

        log::info!(
            "Laid out {} glyphs in {:.0}x{:.0}px, {} quads, {} texture binds, final pen ({:.1}, {:.1})",
            font.glyph_count(),
            bounds.width(),
            bounds.height(),
            backend.draw_calls().len(),
            backend.bind_count(),
            pen.x,
            pen.y
        );
        log::debug!("Vertex data: {} bytes", backend.vertex_bytes().len());

        for (i, page) in font.realizer().atlas().pages().iter().enumerate() {
            let path = self.output_dir.join(format!("atlas_{i}.png"));
            backend.save_texture_png(page.texture, &path)?;
            log::info!("Wrote {}x{} atlas page to {}", page.width, page.height, path.display());
        }
        Ok(bounds)
    }

    /// Lay out again with CPU glyphs into a canvas sized to `bounds`
    fn render_pixmap(&self, bounds: &BBox) -> Result<(), DemoError> {
        let font_config = &self.config.font;
        let width = bounds.width().ceil().max(0.0) as u32 + 2 * MARGIN as u32;
        let height = bounds.height().ceil().max(0.0) as u32 + 2 * MARGIN as u32;
        let mut canvas = Canvas::with_origin(
            width,
            height,
            MARGIN - bounds.lower.x.floor() as i32,
            MARGIN + bounds.upper.y.ceil() as i32,
        );

        let face = self.library.open_face_from_file(&self.font_path)?;
        let mut font = Font::new(face, PixmapGlyphs::new());
        font.set_face_size(&mut canvas, font_config.point_size, font_config.resolution)?;

        let mut layout = SimpleLayout::from_config(&self.config.layout);
        layout.render(&mut font, &mut canvas, self.text.as_str(), Vec3::zeros(), RenderMode::FRONT);

        let path = self.output_dir.join("text.png");
        canvas.save_png(&path)?;
        log::info!(
            "Wrote {}x{} rendering ({} pixels covered) to {}",
            canvas.width(),
            canvas.height(),
            canvas.covered_pixels(),
            path.display()
        );
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    log::info!("Starting text demo");
    let demo = TextDemo::from_args(std::env::args().skip(1))?;
    demo.run()?;
    log::info!("Text demo finished");
    Ok(())
}
