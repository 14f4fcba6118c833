/// Flat SVG element writer. Every element is emitted at the top level with
/// inline presentation attributes, which is what office suites import best.
pub(super) struct SvgWriter {
    out: String,
    stroke: String,
    stroke_width: f32,
    font_family: String,
}

#[derive(Debug, Clone, Copy)]
pub(super) enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct TextStyle<'a> {
    pub size: f32,
    pub anchor: Anchor,
    pub fill: &'a str,
    pub bold: bool,
}

impl<'a> TextStyle<'a> {
    pub fn new(size: f32, fill: &'a str) -> Self {
        Self {
            size,
            anchor: Anchor::Middle,
            fill,
            bold: false,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl SvgWriter {
    pub fn new(width: f32, height: f32, stroke: &str, stroke_width: f32, font_family: &str) -> Self {
        let width = width.trunc();
        let height = height.trunc();
        let mut out = String::new();
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        ));
        Self {
            out,
            stroke: stroke.to_string(),
            stroke_width,
            font_family: font_family.to_string(),
        }
    }

    pub fn line(&mut self, id: &str, from: (f32, f32), to: (f32, f32)) {
        self.line_styled(id, from, to, None, None);
    }

    pub fn line_styled(
        &mut self,
        id: &str,
        from: (f32, f32),
        to: (f32, f32),
        color: Option<&str>,
        dash: Option<&str>,
    ) {
        let color = color.unwrap_or(self.stroke.as_str());
        self.out.push_str(&format!(
            "<line id=\"{}\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"",
            escape_xml(id),
            from.0,
            from.1,
            to.0,
            to.1,
            escape_xml(color),
            self.stroke_width
        ));
        if let Some(dash) = dash {
            self.out
                .push_str(&format!(" stroke-dasharray=\"{}\"", escape_xml(dash)));
        }
        self.out.push_str("/>");
    }

    pub fn rect(&mut self, id: &str, x: f32, y: f32, size: f32, fill: &str) {
        self.out.push_str(&format!(
            "<rect id=\"{}\" x=\"{x:.2}\" y=\"{y:.2}\" width=\"{size:.2}\" height=\"{size:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            escape_xml(id),
            escape_xml(fill),
            escape_xml(&self.stroke),
            self.stroke_width
        ));
    }

    pub fn circle(&mut self, id: &str, cx: f32, cy: f32, r: f32, fill: &str) {
        self.out.push_str(&format!(
            "<circle id=\"{}\" cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            escape_xml(id),
            escape_xml(fill),
            escape_xml(&self.stroke),
            self.stroke_width
        ));
    }

    /// Polygon with the default outline, or none when `outlined` is false.
    pub fn polygon(&mut self, id: &str, points: &[(f32, f32)], fill: &str, outlined: bool) {
        let points = points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        let stroke = if outlined {
            format!(
                "stroke=\"{}\" stroke-width=\"{}\"",
                escape_xml(&self.stroke),
                self.stroke_width
            )
        } else {
            "stroke=\"none\"".to_string()
        };
        self.out.push_str(&format!(
            "<polygon id=\"{}\" points=\"{points}\" fill=\"{}\" {stroke}/>",
            escape_xml(id),
            escape_xml(fill),
        ));
    }

    pub fn text(&mut self, id: &str, x: f32, y: f32, content: &str, style: TextStyle<'_>) {
        let weight = if style.bold { " font-weight=\"bold\"" } else { "" };
        self.out.push_str(&format!(
            "<text id=\"{}\" x=\"{x:.2}\" y=\"{y:.2}\" font-size=\"{}\" text-anchor=\"{}\" font-family=\"{}\"{weight} fill=\"{}\">{}</text>",
            escape_xml(id),
            style.size,
            style.anchor.as_str(),
            escape_xml(&self.font_family),
            escape_xml(style.fill),
            escape_xml(content)
        ));
    }

    pub fn finish(mut self) -> String {
        self.out.push_str("</svg>");
        self.out
    }
}

/// Joins id parts with `_`; keeps letters and digits of any script plus `_`
/// and `-`, maps everything else to `_`.
pub(super) fn sid(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .take(180)
        .collect()
}

pub(super) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
