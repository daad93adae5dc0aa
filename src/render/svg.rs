// SVG backend: writes a scene as a standalone <svg> document.

use std::fmt::Write;

use super::{CircleItem, LabelItem, Rect, Surface};

const CLIP_ID: &str = "treerings-clip";

#[derive(Debug, Default)]
pub struct SvgSurface {
    out: String,
    labels: usize,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The document painted so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl Surface for SvgSurface {
    fn begin(&mut self, width: f64, height: f64, clip: &Rect) {
        self.out.clear();
        self.labels = 0;
        let _ = write!(
            self.out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
             viewBox=\"0 0 {width} {height}\">"
        );
        let _ = write!(
            self.out,
            "<defs><clipPath id=\"{CLIP_ID}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath></defs>",
            clip.x, clip.y, clip.width, clip.height
        );
        let _ = write!(self.out, "<g clip-path=\"url(#{CLIP_ID})\">");
    }

    fn circle(&mut self, c: &CircleItem) {
        let _ = write!(
            self.out,
            "<circle data-node=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" fill-opacity=\"{}\" \
             stroke=\"{}\" stroke-width=\"{}\"/>",
            c.source.0,
            c.center.x,
            c.center.y,
            c.radius,
            c.style.fill.to_hex(),
            c.style.fill_opacity,
            c.style.stroke.to_hex(),
            c.style.stroke_width
        );
    }

    fn label(&mut self, label: &LabelItem) {
        let id = format!("label-arc-{}", self.labels);
        self.labels += 1;
        let _ = write!(self.out, "<path id=\"{id}\" d=\"{}\" fill=\"none\"/>", label.arc.path_data());
        let _ = write!(
            self.out,
            "<text font-size=\"{}\" pointer-events=\"none\"><textPath href=\"#{id}\" startOffset=\"50%\" \
             text-anchor=\"middle\">{}</textPath></text>",
            label.font_size,
            escape(&label.text)
        );
    }

    fn end(&mut self) {
        self.out.push_str("</g></svg>");
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{NodeIndex, SourceRef};
    use crate::layout::Point;
    use crate::render::{paint, CircleState, CircleStyle, LabelArc, Rgb, Scene};

    fn scene() -> Scene {
        let style = CircleStyle::for_state(Rgb::new(0, 0, 0), CircleState::Default);
        Scene {
            width: 100.0,
            height: 80.0,
            clip: Rect { x: 0.0, y: 0.0, width: 100.0, height: 80.0 },
            circles: vec![CircleItem {
                node: NodeIndex(0),
                source: SourceRef(7),
                center: Point::new(50.0, 40.0),
                radius: 30.0,
                depth: 0,
                state: CircleState::Default,
                style,
            }],
            labels: vec![LabelItem {
                node: NodeIndex(0),
                text: "a<b>&c".to_string(),
                font_size: 14.0,
                arc: LabelArc { center: Point::new(50.0, 40.0), radius: 16.0 },
                pointer_events: false,
            }],
        }
    }

    #[test]
    fn test_document_structure() {
        let mut svg = SvgSurface::new();
        paint(&scene(), &mut svg);
        let out = svg.finish();

        assert!(out.starts_with("<svg "));
        assert!(out.ends_with("</g></svg>"));
        assert!(out.contains("<clipPath id=\"treerings-clip\"><rect x=\"0\" y=\"0\" width=\"100\" height=\"80\"/>"));
        assert!(out.contains("<circle data-node=\"7\" cx=\"50\" cy=\"40\" r=\"30\" fill=\"#000000\""));
    }

    #[test]
    fn test_label_follows_arc_and_ignores_pointer() {
        let mut svg = SvgSurface::new();
        paint(&scene(), &mut svg);
        let out = svg.as_str();

        assert!(out.contains("<path id=\"label-arc-0\" d=\"M 34 40 A 16 16 0 0 1 66 40\" fill=\"none\"/>"));
        assert!(out.contains("pointer-events=\"none\""));
        assert!(out.contains("href=\"#label-arc-0\""));
        assert!(out.contains(">a&lt;b&gt;&amp;c</textPath>"));
        // Labels are painted after every circle.
        assert!(out.find("<circle").unwrap() < out.find("<text").unwrap());
    }

    #[test]
    fn test_repaint_starts_fresh() {
        let mut svg = SvgSurface::new();
        paint(&scene(), &mut svg);
        let first = svg.as_str().to_string();
        paint(&scene(), &mut svg);
        assert_eq!(svg.as_str(), first);
    }
}
