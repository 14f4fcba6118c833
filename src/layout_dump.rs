use crate::ir::{Partners, Pedigree};
use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub width: f32,
    pub height: f32,
    pub min_generation: u32,
    pub nodes: Vec<NodeDump>,
    pub families: Vec<FamilyDump>,
    pub sibships: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub generation: u32,
    pub x: f32,
    pub y: f32,
    pub rank: usize,
}

#[derive(Debug, Serialize)]
pub struct FamilyDump {
    pub partners: Vec<String>,
    /// `single_parent` or the relationship kind of a couple.
    pub kind: String,
    pub children: Vec<String>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, pedigree: &Pedigree) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                generation: node.generation,
                x: node.x,
                y: node.y,
                rank: node.rank,
            })
            .collect();

        let families = pedigree
            .families
            .iter()
            .map(|family| FamilyDump {
                partners: family.partners.ids().into_iter().map(str::to_string).collect(),
                kind: match &family.partners {
                    Partners::SingleParent { .. } => "single_parent".to_string(),
                    Partners::Couple { kind, .. } => kind.as_str().to_string(),
                },
                children: family.children.clone(),
            })
            .collect();

        LayoutDump {
            title: pedigree.meta.title.clone(),
            width: layout.width,
            height: layout.height,
            min_generation: layout.min_generation,
            nodes,
            families,
            sibships: pedigree
                .sibships
                .iter()
                .map(|sibship| sibship.siblings.clone())
                .collect(),
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout, pedigree: &Pedigree) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, pedigree);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
