//! Renders the fog produced for a small dungeon to an SVG file.
//!
//! Run with: cargo run --example visualize
//! Set `RUST_LOG=dynfog=debug` to watch the pass.

use dynfog::io::commands_to_svg_path;
use dynfog::scene::{keys, Item, ItemContent, Layer, MemoryScene};
use dynfog::{PassOutcome, Point2, VisionSession};
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::Write;

const SIZE: f64 = 800.0;

/// Minimal SVG document builder.
struct Svg {
    content: String,
}

impl Svg {
    fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    fn rect(&mut self, w: f64, h: f64, fill: &str) {
        self.content.push_str(&format!(
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            w, h, fill
        ));
        self.content.push('\n');
    }

    fn path(&mut self, d: &str, fill: &str, opacity: f64) {
        self.content.push_str(&format!(
            r#"<path d="{}" fill="{}" fill-opacity="{}" fill-rule="evenodd"/>"#,
            d, fill, opacity
        ));
        self.content.push('\n');
    }

    fn polyline(&mut self, points: &[Point2<f64>], stroke: &str) {
        let pts: String = points
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        self.content.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="4" stroke-linecap="round"/>"#,
            pts, stroke
        ));
        self.content.push('\n');
    }

    fn circle(&mut self, center: Point2<f64>, fill: &str) {
        self.content.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="8" fill="{}"/>"#,
            center.x, center.y, fill
        ));
        self.content.push('\n');
    }

    fn save(&self, path: &str) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        writeln!(
            file,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{SIZE}" height="{SIZE}" viewBox="0 0 {SIZE} {SIZE}">"#
        )?;
        file.write_all(self.content.as_bytes())?;
        writeln!(file, "</svg>")
    }
}

fn wall(id: &str, points: &[(f64, f64)], closed: bool) -> Item {
    Item::new(
        id,
        Layer::Drawing,
        ItemContent::Shape {
            points: points.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
            closed: Some(closed),
        },
    )
    .with_meta(keys::IS_VISION_LINE, true)
}

fn build_scene() -> Result<MemoryScene, dynfog::StoreError> {
    let scene = MemoryScene::default();
    scene.set_metadata(keys::VISION_ENABLED, true)?;
    scene.set_metadata(keys::FOW_ENABLED, true)?;
    scene.set_metadata(keys::FOW_COLOR, "#202040")?;

    scene.put_item(
        Item::new(
            "map",
            Layer::Map,
            ItemContent::Image {
                width: SIZE,
                height: SIZE,
                dpi: 150.0,
            },
        )
        .with_meta(keys::IS_BACKGROUND_IMAGE, true),
    )?;

    scene.put_item(wall("corridor", &[(300.0, 0.0), (300.0, 350.0)], false))?;
    scene.put_item(wall("room", &[(450.0, 450.0), (650.0, 450.0), (650.0, 650.0), (450.0, 650.0)], true))?;
    scene.put_item(
        wall("door", &[(100.0, 500.0), (250.0, 500.0)], false).with_meta(keys::ONE_SIDED, "left"),
    )?;

    scene.put_item(
        Item::new("rogue", Layer::Character, ItemContent::Empty)
            .with_position(150.0, 200.0)
            .with_meta(keys::HAS_VISION, true),
    )?;
    scene.put_item(
        Item::new("cleric", Layer::Character, ItemContent::Empty)
            .with_position(550.0, 250.0)
            .with_meta(keys::HAS_VISION, true)
            .with_meta(keys::VISION_RANGE, 10),
    )?;

    Ok(scene)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let scene = build_scene()?;
    let session = VisionSession::default();

    match session.evaluate(&scene, false).await? {
        PassOutcome::Completed(report) => println!("{}", report),
        other => println!("pass did not complete: {:?}", other),
    }

    let mut svg = Svg::new();
    svg.rect(SIZE, SIZE, "#d8c8a8");

    for item in scene.items()? {
        match &item.content {
            ItemContent::Path { commands, style } => {
                let d = commands_to_svg_path(commands);
                if item.flag(keys::IS_FOG_OVERLAY) {
                    svg.path(&d, &style.fill_color, style.fill_opacity);
                } else if item.flag(keys::IS_VISION_FOG) {
                    svg.path(&d, "#ffffff", 0.15);
                }
            }
            ItemContent::Shape { points, closed } => {
                let mut pts: Vec<Point2<f64>> = points
                    .iter()
                    .map(|p| p.scale_translate(item.scale, item.position))
                    .collect();
                if *closed != Some(false) {
                    if let Some(&first) = pts.first() {
                        pts.push(first);
                    }
                }
                svg.polyline(&pts, "#402010");
            }
            ItemContent::Empty if item.layer == Layer::Character => svg.circle(item.position, "#c03030"),
            _ => {}
        }
    }

    std::fs::create_dir_all("screenshots")?;
    svg.save("screenshots/fog.svg")?;
    println!("Wrote screenshots/fog.svg");
    Ok(())
}
