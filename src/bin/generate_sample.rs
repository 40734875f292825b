//! Write one sample CSV per category using the default file names.
//!
//! Usage: `generate-sample [OUT_DIR]` (defaults to the current directory).
//! Headers and some cells are deliberately padded, and a few cells are blank
//! or whitespace-only, so the server's normalisation is visible end to end.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use pathogen_atlas::Category;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }
}

/// (name, transmission, host, shared behavior)
type Row = (&'static str, &'static str, &'static str, &'static str);

fn rows(category: Category) -> &'static [Row] {
    match category {
        Category::Virus => &[
            ("Rabies Virus", "Animal bite", "", "Neurotropic spread along peripheral nerves"),
            ("Influenza A", "Respiratory droplets", "Birds, pigs, humans", "Antigenic drift and shift"),
            ("  Zika Virus ", "Mosquito (Aedes)", "Humans, primates", "Vertical transmission"),
            ("SARS-CoV-2", "Aerosols", "Humans, bats", "   "),
            ("Dengue Virus", "Mosquito (Aedes)", "Humans", "Antibody-dependent enhancement"),
        ],
        Category::Bacteria => &[
            ("Escherichia coli", "Fecal-oral", "Mammals", "Biofilm formation"),
            ("Staphylococcus aureus", "Contact", "Humans", "Toxin production"),
            ("Mycobacterium tuberculosis", "Aerosols", "Humans", "Intracellular persistence"),
            ("Vibrio cholerae", "Contaminated water", "", "Quorum sensing"),
        ],
        Category::Fungi => &[
            ("Candida auris", "Contact", "Humans", "Multidrug resistance"),
            ("Aspergillus fumigatus", "Inhaled spores", "Humans, birds", "Thermotolerance"),
            ("Cryptococcus neoformans ", "Inhaled spores", "Humans", "Capsule formation"),
            ("Batrachochytrium dendrobatidis", "Water", "Amphibians", ""),
        ],
        Category::Others => &[
            ("Plasmodium falciparum", "Mosquito (Anopheles)", "Humans", "Antigenic variation"),
            ("Toxoplasma gondii", "Ingestion", "Cats, mammals", "Host behavior manipulation"),
            ("Prion (PrPSc)", "Ingestion", "Mammals", "Templated misfolding"),
        ],
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    for category in Category::ALL {
        let file_name = category.default_files()[0];
        let path = out_dir.join(file_name);
        let mut writer =
            csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;

        writer.write_record([
            format!(" {} ", category.identifying_column()),
            "Transmission".to_string(),
            " Host".to_string(),
            "Incubation (days)".to_string(),
            "Shared Behavior ".to_string(),
        ])?;

        let data = rows(category);
        for &(name, transmission, host, behavior) in data {
            let incubation = rng.range(1, 60).to_string();
            writer.write_record([name, transmission, host, incubation.as_str(), behavior])?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", data.len(), path.display());
    }

    Ok(())
}
