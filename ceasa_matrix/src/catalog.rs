use std::ops::Range;

/// A thematic block of the evaluation matrix.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Block {
    pub id: &'static str,
    pub title: &'static str,
    pub activities: &'static [&'static str],
}

/// The fixed taxonomy of the evaluation matrix: blocks in row order and the
/// regions under evaluation.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct SchemaCatalog {
    blocks: &'static [Block],
    regions: &'static [&'static str],
}

pub const GLOBAL_REGION: &str = "GLOBAL";

const CEASA_BLOCKS: [Block; 6] = [
    Block {
        id: "BLOCO 1",
        title: "Estratégia de Coleta e Redistribuição",
        activities: &[
            "Articulação",
            "Triagem e Logística",
            "Enriquecimento da captação",
        ],
    },
    Block {
        id: "BLOCO 2",
        title: "Operação do Banco de Alimentos",
        activities: &["Estrutura", "Processos"],
    },
    Block {
        id: "BLOCO 3",
        title: "Sustentabilidade Financeira",
        activities: &["Aporte Inicial", "Custos de Operação"],
    },
    Block {
        id: "BLOCO 4",
        title: "Sustentabilidade e Prevenção de Descarte",
        activities: &[
            "Sustentabilidade do Banco de Alimentos",
            "Sustentabilidade da Ceasa",
        ],
    },
    Block {
        id: "BLOCO 5",
        title: "Monitoramento e Gestão",
        activities: &["Resultados de Eficiência"],
    },
    Block {
        id: "BLOCO 6",
        title: "Estrutura Física",
        activities: &["Edificação"],
    },
];

const CEASA_REGIONS: [&str; 7] = [
    "Belem/PA",
    "São Luis/MA",
    "CEAGESP/SP",
    "Mais Nutrição/CE",
    "PRODAL/MG",
    "Curitiba/PR",
    GLOBAL_REGION,
];

impl SchemaCatalog {
    /// The evaluation matrix of the Ceasas.
    pub const CEASA: SchemaCatalog = SchemaCatalog {
        blocks: &CEASA_BLOCKS,
        regions: &CEASA_REGIONS,
    };

    pub const fn new(blocks: &'static [Block], regions: &'static [&'static str]) -> SchemaCatalog {
        SchemaCatalog { blocks, regions }
    }

    pub fn blocks(&self) -> &'static [Block] {
        self.blocks
    }

    pub fn regions(&self) -> &'static [&'static str] {
        self.regions
    }

    pub fn block(&self, id: &str) -> Option<&'static Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// The row range of every block, in catalog order.
    ///
    /// The rows of the spreadsheet follow the catalog exactly: the activities of
    /// the first block, then those of the second one, and so on. Nothing in the
    /// data marks the boundaries.
    pub fn row_layout(&self) -> Vec<(&'static Block, Range<usize>)> {
        let mut start = 0;
        let mut res = Vec::with_capacity(self.blocks.len());
        for b in self.blocks.iter() {
            let end = start + b.activities.len();
            res.push((b, start..end));
            start = end;
        }
        res
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        SchemaCatalog::CEASA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceasa_catalog() {
        let c = SchemaCatalog::CEASA;
        assert_eq!(c.blocks().len(), 6);
        assert_eq!(c.regions().len(), 7);
        assert_eq!(c.regions().last(), Some(&GLOBAL_REGION));
        assert_eq!(c.block("BLOCO 5").map(|b| b.activities.len()), Some(1));
        assert!(c.block("BLOCO 7").is_none());
    }

    #[test]
    fn row_layout_offsets() {
        let ranges: Vec<(&str, std::ops::Range<usize>)> = SchemaCatalog::CEASA
            .row_layout()
            .into_iter()
            .map(|(b, r)| (b.id, r))
            .collect();
        assert_eq!(
            ranges,
            vec![
                ("BLOCO 1", 0..3),
                ("BLOCO 2", 3..5),
                ("BLOCO 3", 5..7),
                ("BLOCO 4", 7..9),
                ("BLOCO 5", 9..10),
                ("BLOCO 6", 10..11),
            ]
        );
    }
}
