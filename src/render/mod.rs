mod annotations;
mod lines;
mod person;
mod svg;

use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::{Individual, Partners, Pedigree};
use crate::layout::generation::int_to_roman;
use crate::layout::{Layout, NodeLayout};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

use svg::{Anchor, SvgWriter, TextStyle, sid};

const LEGEND_ITEMS: [(&str, &str); 4] = [
    ("■", "罹患者 (Affected)"),
    ("／", "死亡 (Deceased)"),
    ("P", "発端者 (Proband)"),
    ("*", "記録確認済 (Verified)"),
];

/// Renders a laid-out pedigree as a flat SVG document.
pub fn render_svg(
    pedigree: &Pedigree,
    layout: &Layout,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
) -> String {
    let mut painter = Painter {
        svg: SvgWriter::new(
            layout.width,
            layout.height,
            &theme.line_color,
            render.stroke_width,
            &theme.font_family,
        ),
        pedigree,
        layout,
        theme,
        symbol_size: config.symbol_size,
        wrap_chars: render.wrap_chars,
    };

    painter.draw_generation_labels(config);
    painter.draw_metadata();
    if render.show_legend || pedigree.meta.show_legend {
        painter.draw_legend();
    }
    painter.draw_families();
    for sibship in &pedigree.sibships {
        painter.draw_sibship(sibship);
    }
    for person in &pedigree.individuals {
        if let Some(placed) = painter.placed(&person.id) {
            painter.draw_person(placed);
        }
    }
    painter.svg.finish()
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Arial".to_string();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid default canvas size"))?;

    // The SVG itself stays transparent; raster output gets an opaque backdrop.
    let backed = match svg.find('>') {
        Some(end) => format!(
            "{}<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>{}",
            &svg[..=end],
            svg::escape_xml(&render_cfg.background),
            &svg[end + 1..]
        ),
        None => svg.to_string(),
    };
    let tree = usvg::Tree::from_str(&backed, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

/// One individual together with its final placement.
#[derive(Clone, Copy)]
pub(super) struct Placed<'a> {
    pub person: &'a Individual,
    pub node: &'a NodeLayout,
}

impl Placed<'_> {
    fn id(&self) -> &str {
        &self.person.id
    }

    fn x(&self) -> f32 {
        self.node.x
    }

    fn y(&self) -> f32 {
        self.node.y
    }

    fn generation(&self) -> u32 {
        self.node.generation
    }
}

pub(super) struct Painter<'a> {
    svg: SvgWriter,
    pedigree: &'a Pedigree,
    layout: &'a Layout,
    theme: &'a Theme,
    symbol_size: f32,
    wrap_chars: usize,
}

impl<'a> Painter<'a> {
    fn placed(&self, id: &str) -> Option<Placed<'a>> {
        let person = self.pedigree.get(id)?;
        let node = self.layout.node(id)?;
        Some(Placed { person, node })
    }

    fn draw_generation_labels(&mut self, config: &LayoutConfig) {
        for generation in self.layout.generations() {
            let label = int_to_roman(generation);
            let y = (generation - self.layout.min_generation) as f32 * config.generation_gap
                + config.margin_y;
            self.svg.text(
                &sid(&["gen", &label]),
                8.0,
                y + 4.0,
                &label,
                TextStyle::new(14.0, &self.theme.muted_text_color).anchor(Anchor::Start),
            );
        }
    }

    /// Creation date only; author names are left off the chart.
    fn draw_metadata(&mut self) {
        let created = self
            .pedigree
            .meta
            .date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| chrono::Local::now().date_naive().to_string());
        let width = self.layout.width.trunc();
        let height = self.layout.height.trunc();
        self.svg.text(
            &sid(&["meta"]),
            width - 8.0,
            height - 10.0,
            &created,
            TextStyle::new(12.0, &self.theme.muted_text_color).anchor(Anchor::End),
        );
    }

    fn draw_legend(&mut self) {
        let start_x = 10.0;
        let start_y = self.layout.height.trunc() - 120.0;
        let line_height = 18.0;

        self.svg.text(
            "legend_title",
            start_x,
            start_y,
            "凡例 (Legend)",
            TextStyle::new(11.0, &self.theme.text_color)
                .anchor(Anchor::Start)
                .bold(),
        );
        for (idx, (symbol, description)) in LEGEND_ITEMS.iter().enumerate() {
            let y = start_y + line_height * (idx + 1) as f32;
            self.svg.text(
                &format!("legend_symbol_{idx}"),
                start_x + 5.0,
                y,
                symbol,
                TextStyle::new(10.0, &self.theme.text_color).anchor(Anchor::Start),
            );
            self.svg.text(
                &format!("legend_desc_{idx}"),
                start_x + 25.0,
                y,
                description,
                TextStyle::new(10.0, &self.theme.muted_text_color).anchor(Anchor::Start),
            );
        }
    }

    fn draw_families(&mut self) {
        let pedigree = self.pedigree;
        for family in &pedigree.families {
            let children: Vec<Placed<'a>> = family
                .children
                .iter()
                .filter_map(|id| self.placed(id))
                .collect();
            match &family.partners {
                Partners::SingleParent { parent } => {
                    let Some(parent) = self.placed(parent) else {
                        continue;
                    };
                    self.draw_single_parent_descent(parent, &children, family);
                }
                Partners::Couple { a, b, kind } => {
                    let (Some(p1), Some(p2)) = (self.placed(a), self.placed(b)) else {
                        continue;
                    };
                    self.draw_spouse_line(p1, p2, *kind);
                    self.draw_couple_descent(p1, p2, &children, family);
                }
            }
        }
    }
}
