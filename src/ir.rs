use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "M" => Self::Male,
            "F" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "U",
        }
    }
}

/// Orthogonal clinical status tags. Only the drawing layer reads these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Affected,
    Deceased,
    Stillbirth,
    Miscarriage,
    Abortion,
    Ectopic,
    Pregnancy,
    Carrier,
    Proband,
    Consultand,
    Verified,
    Donor,
    Surrogate,
    Adopted,
}

impl Status {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let status = match tag.trim().to_ascii_lowercase().as_str() {
            "affected" => Self::Affected,
            "deceased" => Self::Deceased,
            "stillbirth" => Self::Stillbirth,
            "miscarriage" => Self::Miscarriage,
            "abortion" => Self::Abortion,
            "ectopic" => Self::Ectopic,
            "pregnancy" => Self::Pregnancy,
            "carrier" | "presymptomatic_carrier" => Self::Carrier,
            "proband" => Self::Proband,
            "consultand" => Self::Consultand,
            "verified" => Self::Verified,
            "donor" => Self::Donor,
            "surrogate" => Self::Surrogate,
            "adopted" => Self::Adopted,
            _ => return None,
        };
        Some(status)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnosis {
    pub condition: String,
    pub age_at_diagnosis: Option<String>,
    pub age_unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneticTesting {
    pub tested: bool,
    pub result: Option<String>,
    pub display: Option<String>,
    pub label: Option<String>,
    pub test_type: Option<String>,
    pub variant: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zygosity {
    Monozygotic,
    Dizygotic,
    #[default]
    Unknown,
}

impl Zygosity {
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "mz" | "mono" | "monozygotic" | "identical" => Self::Monozygotic,
            "dz" | "di" | "dizygotic" | "fraternal" => Self::Dizygotic,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Twin {
    pub group: String,
    pub zygosity: Zygosity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PregnancyKind {
    /// Spontaneous abortion (miscarriage).
    Sab,
    /// Termination of pregnancy.
    Top,
    Ectopic,
    Other(String),
}

impl PregnancyKind {
    pub fn from_token(token: &str) -> Option<Self> {
        let upper = token.trim().to_ascii_uppercase();
        match upper.as_str() {
            "" => None,
            "SAB" => Some(Self::Sab),
            "TOP" => Some(Self::Top),
            "ECT" => Some(Self::Ectopic),
            _ => Some(Self::Other(upper)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PregnancyEvent {
    pub kind: Option<PregnancyKind>,
    pub gestational_age: Option<String>,
    pub lmp: Option<String>,
    pub edd: Option<String>,
    pub karyotype: Option<String>,
    pub note: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub id: String,
    pub sex: Sex,
    pub generation: u32,
    pub status: BTreeSet<Status>,
    pub age: Option<String>,
    pub age_unit: String,
    pub diagnoses: Vec<Diagnosis>,
    pub medical_notes: Vec<String>,
    pub genetic_testing: Option<GeneticTesting>,
    pub name: Option<String>,
    pub sex_at_birth: Option<String>,
    pub count: Option<String>,
    pub twin: Option<Twin>,
    pub pregnancy: Option<PregnancyEvent>,
    pub adoption_bracket: bool,
}

impl Individual {
    pub fn new(id: impl Into<String>, sex: Sex, generation: u32) -> Self {
        Self {
            id: id.into(),
            sex,
            generation,
            status: BTreeSet::new(),
            age: None,
            age_unit: "y".to_string(),
            diagnoses: Vec::new(),
            medical_notes: Vec::new(),
            genetic_testing: None,
            name: None,
            sex_at_birth: None,
            count: None,
            twin: None,
            pregnancy: None,
            adoption_bracket: false,
        }
    }

    pub fn has(&self, status: Status) -> bool {
        self.status.contains(&status)
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status.insert(status);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelationKind {
    #[default]
    Spouse,
    Consanguineous,
    Divorced,
    Separated,
}

impl RelationKind {
    /// Unrecognised kinds fall back to a standard union.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "consanguineous" => Self::Consanguineous,
            "divorced" => Self::Divorced,
            "separated" => Self::Separated,
            _ => Self::Spouse,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spouse => "spouse",
            Self::Consanguineous => "consanguineous",
            Self::Divorced => "divorced",
            Self::Separated => "separated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partners {
    SingleParent {
        parent: String,
    },
    Couple {
        a: String,
        b: String,
        kind: RelationKind,
    },
}

impl Partners {
    pub fn ids(&self) -> Vec<&str> {
        match self {
            Self::SingleParent { parent } => vec![parent.as_str()],
            Self::Couple { a, b, .. } => vec![a.as_str(), b.as_str()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRelation {
    Adopted,
    AdoptedIn,
    AdoptedOut,
    Foster,
}

impl ChildRelation {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "adopted" => Some(Self::Adopted),
            "adopted_in" => Some(Self::AdoptedIn),
            "adopted_out" => Some(Self::AdoptedOut),
            "foster" => Some(Self::Foster),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    pub partners: Partners,
    pub children: Vec<String>,
    pub child_relations: BTreeMap<String, ChildRelation>,
}

impl Family {
    pub fn new(partners: Partners, children: Vec<String>) -> Self {
        Self {
            partners,
            children,
            child_relations: BTreeMap::new(),
        }
    }

    pub fn is_adoptive(&self, child: &str) -> bool {
        self.child_relations.contains_key(child)
    }
}

/// Siblings recorded without any parent in the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sibship {
    pub siblings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartMeta {
    pub date: Option<String>,
    pub title: Option<String>,
    pub show_legend: bool,
}

/// The validated entity graph. Individuals are kept in input order, so an
/// individual's position in `individuals` is its input-order index.
#[derive(Debug, Clone, Default)]
pub struct Pedigree {
    pub individuals: Vec<Individual>,
    pub families: Vec<Family>,
    pub sibships: Vec<Sibship>,
    pub meta: ChartMeta,
    index: HashMap<String, usize>,
}

impl Pedigree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and keeps the existing entry) when the id is taken.
    pub fn add_individual(&mut self, individual: Individual) -> bool {
        if self.index.contains_key(&individual.id) {
            return false;
        }
        self.index
            .insert(individual.id.clone(), self.individuals.len());
        self.individuals.push(individual);
        true
    }

    pub fn input_order(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Individual> {
        self.input_order(id).map(|idx| &self.individuals[idx])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Individual> {
        let idx = self.input_order(id)?;
        self.individuals.get_mut(idx)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Distinct generations present, ascending.
    pub fn generations(&self) -> Vec<u32> {
        let mut generations: Vec<u32> = self.individuals.iter().map(|p| p.generation).collect();
        generations.sort_unstable();
        generations.dedup();
        generations
    }

    pub fn generation_range(&self) -> Option<(u32, u32)> {
        let min = self.individuals.iter().map(|p| p.generation).min()?;
        let max = self.individuals.iter().map(|p| p.generation).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut pedigree = Pedigree::new();
        assert!(pedigree.add_individual(Individual::new("I-1", Sex::Male, 1)));
        assert!(!pedigree.add_individual(Individual::new("I-1", Sex::Female, 1)));
        assert_eq!(pedigree.len(), 1);
        assert_eq!(pedigree.get("I-1").map(|p| p.sex), Some(Sex::Male));
    }

    #[test]
    fn input_order_follows_insertion() {
        let mut pedigree = Pedigree::new();
        pedigree.add_individual(Individual::new("B", Sex::Male, 2));
        pedigree.add_individual(Individual::new("A", Sex::Female, 1));
        assert_eq!(pedigree.input_order("B"), Some(0));
        assert_eq!(pedigree.input_order("A"), Some(1));
        assert_eq!(pedigree.input_order("Z"), None);
        assert_eq!(pedigree.generation_range(), Some((1, 2)));
        assert_eq!(pedigree.generations(), vec![1, 2]);
    }

    #[test]
    fn status_tags_map_carrier_aliases() {
        assert_eq!(Status::from_tag("carrier"), Some(Status::Carrier));
        assert_eq!(
            Status::from_tag("presymptomatic_carrier"),
            Some(Status::Carrier)
        );
        assert_eq!(Status::from_tag("Affected"), Some(Status::Affected));
        assert_eq!(Status::from_tag("unknown_tag"), None);
    }

    #[test]
    fn relation_kind_defaults_to_spouse() {
        assert_eq!(RelationKind::from_token("divorced"), RelationKind::Divorced);
        assert_eq!(RelationKind::from_token("partner"), RelationKind::Spouse);
        assert_eq!(Sex::from_code("f"), Sex::Female);
        assert_eq!(Sex::from_code("X"), Sex::Unknown);
    }
}
