use std::path::Path;

use pedigree_renderer::{
    Layout, LayoutConfig, Pedigree, RenderConfig, Theme, compute_layout, parse_pedigree,
    render_svg,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
    assert!(!svg.contains("<g"), "{fixture}: groups are not allowed");
    assert!(!svg.contains("<marker"), "{fixture}: markers are not allowed");
}

fn load_fixture(name: &str) -> Pedigree {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_pedigree(&input).expect("parse failed")
}

fn layout_and_render(pedigree: &Pedigree) -> (Layout, String) {
    let config = LayoutConfig::default();
    let layout = compute_layout(pedigree, &config);
    let svg = render_svg(
        pedigree,
        &layout,
        &Theme::default(),
        &config,
        &RenderConfig::default(),
    );
    (layout, svg)
}

fn x_of(layout: &Layout, id: &str) -> f32 {
    layout.node(id).expect("node missing").x
}

const FIXTURES: [&str; 6] = [
    "basic.json",
    "single_parent.json",
    "johboc_figure5.json",
    "twins_adoption.json",
    "pregnancy.json",
    "empty.json",
];

#[test]
fn render_all_fixtures() {
    for name in FIXTURES {
        let pedigree = load_fixture(name);
        let (layout, svg) = layout_and_render(&pedigree);
        assert_valid_svg(&svg, name);
        assert_eq!(layout.nodes.len(), pedigree.individuals.len(), "{name}");
    }
}

#[test]
fn layouts_are_deterministic() {
    for name in FIXTURES {
        let pedigree = load_fixture(name);
        let (first, first_svg) = layout_and_render(&pedigree);
        let (second, second_svg) = layout_and_render(&pedigree);
        assert_eq!(first.nodes, second.nodes, "{name}");
        assert_eq!(first_svg, second_svg, "{name}");
    }
}

#[test]
fn rows_never_overlap_and_ranks_follow_x() {
    let config = LayoutConfig::default();
    let min_pitch = config.symbol_size + config.min_unit_gap;
    for name in FIXTURES {
        let pedigree = load_fixture(name);
        let layout = compute_layout(&pedigree, &config);
        for generation in layout.generations() {
            let row = layout.row(generation);
            for (idx, node) in row.iter().enumerate() {
                assert_eq!(node.rank, idx + 1, "{name}: gen {generation}");
            }
            for pair in row.windows(2) {
                assert!(
                    pair[1].x - pair[0].x >= min_pitch - 1e-3,
                    "{name}: {} and {} overlap",
                    pair[0].id,
                    pair[1].id
                );
            }
        }
    }
}

#[test]
fn couples_sit_one_offset_apart() {
    let config = LayoutConfig::default();
    for name in FIXTURES {
        let pedigree = load_fixture(name);
        let layout = compute_layout(&pedigree, &config);
        for family in &pedigree.families {
            let ids = family.partners.ids();
            if let [a, b] = ids.as_slice() {
                let (na, nb) = (layout.node(a).unwrap(), layout.node(b).unwrap());
                if na.generation == nb.generation {
                    assert!(
                        ((na.x - nb.x).abs() - config.couple_offset()).abs() < 1e-3,
                        "{name}: {a} x {b}"
                    );
                }
            }
        }
    }
}

#[test]
fn basic_child_centers_under_couple() {
    let pedigree = load_fixture("basic.json");
    let (layout, svg) = layout_and_render(&pedigree);
    let config = LayoutConfig::default();

    assert!(x_of(&layout, "A") < x_of(&layout, "B"));
    let mid = (x_of(&layout, "B") + x_of(&layout, "C")) / 2.0;
    assert!((x_of(&layout, "D") - mid).abs() < 1e-3);
    let b = layout.node("B").unwrap();
    let d = layout.node("D").unwrap();
    assert_eq!(d.y, b.y + config.generation_gap);

    assert!(svg.contains("id=\"arrow_D_shaft\""));
    assert!(svg.contains(">34y</text>"));
    assert!(svg.contains(">2025-01-15</text>"));
}

#[test]
fn single_parent_children_straddle_parent() {
    let pedigree = load_fixture("single_parent.json");
    let config = LayoutConfig {
        child_spacing_extra: 80.0,
        ..LayoutConfig::default()
    };
    let layout = compute_layout(&pedigree, &config);
    let half_spacing = config.child_spacing() / 2.0;

    let parent = x_of(&layout, "I-1");
    assert!((x_of(&layout, "II-1") - (parent - half_spacing)).abs() < 1e-3);
    assert!((x_of(&layout, "II-2") - (parent + half_spacing)).abs() < 1e-3);
}

#[test]
fn single_parent_default_spacing_pushes_second_child() {
    let pedigree = load_fixture("single_parent.json");
    let (layout, svg) = layout_and_render(&pedigree);

    assert_eq!(x_of(&layout, "I-1"), 98.0);
    assert_eq!(x_of(&layout, "II-1"), 60.0);
    assert_eq!(x_of(&layout, "II-2"), 180.0);
    assert!(svg.contains("id=\"sib_I-1\""));
    assert!(svg.contains("id=\"child_I-1_II-2\""));
}

#[test]
fn johboc_figure_renders_all_marks() {
    let pedigree = load_fixture("johboc_figure5.json");
    assert_eq!(pedigree.sibships.len(), 1);
    assert_eq!(pedigree.families.len(), 3);
    let (layout, svg) = layout_and_render(&pedigree);

    assert_eq!(layout.generations(), vec![1, 2, 3]);
    assert!(svg.contains(">I</text>"));
    assert!(svg.contains(">III</text>"));
    assert!(svg.contains("legend_title"));
    assert!(svg.contains("id=\"deceased_I-2\""));
    assert!(svg.contains("id=\"deceased_I-3\""));
    assert!(svg.contains("id=\"sibship_to_I-3\""));
    assert!(svg.contains(">d. 60y</text>"));
    assert!(svg.contains(">45y 乳癌</text>"));
    assert!(svg.contains(">心筋梗塞（69歳）</text>"));

    // Every child sits one generation below its parents.
    for family in &pedigree.families {
        let parent_gen = layout.node(family.partners.ids()[0]).unwrap().generation;
        for child in &family.children {
            assert_eq!(layout.node(child).unwrap().generation, parent_gen + 1);
        }
    }
}

#[test]
fn twins_and_adoption_are_drawn() {
    let pedigree = load_fixture("twins_adoption.json");
    let (_, svg) = layout_and_render(&pedigree);

    assert!(svg.contains("id=\"spouse_consanguineous2_I-1_I-2\""));
    assert!(svg.contains("id=\"twin_t1_stem\""));
    assert!(svg.contains("id=\"twin_t1_mz\""));
    assert!(svg.contains("id=\"twin_T_II-4_II-5_stem\""));
    assert!(!svg.contains("twin_T_II-4_II-5_mz"));
    assert!(svg.contains("id=\"carrier_I-2\""));
    assert!(svg.contains("id=\"adopt_II-3_L\""));
    assert!(svg.contains("stroke-dasharray=\"6,4\""));
    assert!(svg.contains(">7y</text>"));
}

#[test]
fn pregnancy_outcomes_use_triangles() {
    let pedigree = load_fixture("pregnancy.json");
    let (_, svg) = layout_and_render(&pedigree);

    assert!(svg.contains("id=\"divorce_1_I-1_I-2\""));
    assert!(svg.contains("<polygon id=\"sym_II-1\""));
    assert!(svg.contains("id=\"slash_II-1\""));
    assert!(svg.contains("<polygon id=\"sym_II-2\""));
    assert!(!svg.contains("slash_II-2"));
    assert!(svg.contains(">12w</text>"));
    assert!(svg.contains(">LMP 2025-01-10</text>"));
    assert!(svg.contains(">SB</text>"));
    assert!(svg.contains("id=\"deceased_II-4\""));
}

#[test]
fn empty_input_gives_minimal_canvas() {
    let pedigree = load_fixture("empty.json");
    assert!(pedigree.is_empty());
    let (layout, svg) = layout_and_render(&pedigree);
    assert!(layout.is_empty());
    assert_eq!((layout.width, layout.height), (120.0, 80.0));
    assert!(svg.contains("viewBox=\"0 0 120 80\""));
}
