use crate::foreign::ForeignShape;

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl ForeignShape {
    /// Static SVG for export. `inner` is written verbatim: it is the host's
    /// foreign markup and is expected to carry its own XHTML namespace.
    pub fn to_svg(&self, inner: &str) -> String {
        let r = self.rect;
        format!(
            "<foreignObject data-node-id=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\">{}</foreignObject>",
            escape_attr(self.id.as_str()),
            r.x0,
            r.y0,
            r.width(),
            r.height(),
            inner
        )
    }
}

/// Wrap exported shapes in a standalone SVG document sized to `bounds`.
pub fn render_svg(shapes: &[(ForeignShape, String)], bounds: kurbo::Rect) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">\n",
        bounds.width(),
        bounds.height(),
        bounds.x0,
        bounds.y0,
        bounds.width(),
        bounds.height()
    ));
    for (shape, inner) in shapes {
        svg.push_str("  ");
        svg.push_str(&shape.to_svg(inner));
        svg.push('\n');
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foreign::NodeAttributes;
    use fc_core::NodeId;

    #[test]
    fn foreign_object_uses_top_left_corner() {
        let shape = ForeignShape {
            id: NodeId::intern("card"),
            rect: NodeAttributes::new(100.0, 50.0, 40.0, 20.0).mount_rect(),
        };
        assert_eq!(
            shape.to_svg("<div/>"),
            "<foreignObject data-node-id=\"card\" x=\"80\" y=\"40\" width=\"40\" height=\"20\"><div/></foreignObject>"
        );
    }

    #[test]
    fn document_wraps_every_shape() {
        let a = ForeignShape {
            id: NodeId::intern("a\"b"),
            rect: kurbo::Rect::new(0.0, 0.0, 10.0, 10.0),
        };
        let svg = render_svg(&[(a, String::new())], kurbo::Rect::new(0.0, 0.0, 100.0, 50.0));
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\" height=\"50\""));
        assert!(svg.contains("data-node-id=\"a&quot;b\""));
        assert!(svg.ends_with("</svg>"));
    }
}
