use svg::node::element::{Group, Rectangle, Title};
use svg::{Document, Node};

use crate::dataset::DatasetPlan;
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;

pub trait RenderSVG {
    type Canvas;

    /// Render self onto canvas.
    fn render(self, canvas: Self::Canvas) -> Result<Self::Canvas>;
}

fn outline(b: &BoundingBox, stroke: &str) -> Rectangle {
    let tl = b.top_left();
    Rectangle::new()
        .set("x", tl.x())
        .set("y", tl.y())
        .set("width", b.width())
        .set("height", b.height())
        .set("fill", "none")
        .set("stroke", stroke)
        .set("stroke-width", 1.5)
}

/// Overlay of a plan in original image coordinates. Positives are drawn in blue,
/// negative tiles are scaled back from their pyramid level and drawn dashed in green.
impl RenderSVG for &DatasetPlan {
    type Canvas = Document;

    fn render(self, mut document: Document) -> Result<Self::Canvas> {
        let (height, width) = self.dims();
        if height == 0 || width == 0 {
            return Err(Error::Render(format!(
                "cannot render an empty {}x{} image",
                width, height
            )));
        }
        document = document.set("viewBox", (0, 0, width, height));

        document.append(
            Rectangle::new()
                .set("class", "frame")
                .set("width", width)
                .set("height", height)
                .set("fill", "none")
                .set("stroke", "black")
                .set("stroke-width", 1),
        );

        let mut negatives = Group::new()
            .set("class", "negatives")
            .set("stroke-dasharray", "4 2");
        for (n, b) in self.negatives_in_image().iter().enumerate() {
            let mut tile = outline(b, "green");
            tile.append(Title::new().add(svg::node::Text::new(format!("negative {}", n))));
            negatives.append(tile);
        }
        document.append(negatives);

        let mut positives = Group::new().set("class", "positives");
        for (n, b) in self.positives().iter().enumerate() {
            let mut mark = outline(b, "blue");
            mark.append(Title::new().add(svg::node::Text::new(format!("positive {}", n))));
            positives.append(mark);
        }
        document.append(positives);

        Ok(document)
    }
}
