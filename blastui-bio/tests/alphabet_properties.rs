use blastui_bio::alphabet::{
    check_residues, GAP, NUCLEOTIDE_AMBIGUOUS, NUCLEOTIDE_STANDARD, PROTEIN_AMBIGUOUS,
    PROTEIN_STANDARD, STOP,
};
use blastui_core::MoleculeType;
use proptest::prelude::*;

fn alphabet(molecule: MoleculeType) -> Vec<u8> {
    let mut letters = match molecule {
        MoleculeType::Nucleotide => [NUCLEOTIDE_STANDARD, NUCLEOTIDE_AMBIGUOUS].concat(),
        MoleculeType::Protein => [PROTEIN_STANDARD, PROTEIN_AMBIGUOUS, &[STOP][..]].concat(),
    };
    let lower: Vec<u8> = letters.iter().map(|c| c.to_ascii_lowercase()).collect();
    letters.extend(lower);
    letters.push(GAP);
    letters
}

fn molecule() -> impl Strategy<Value = MoleculeType> {
    prop_oneof![Just(MoleculeType::Nucleotide), Just(MoleculeType::Protein)]
}

proptest! {
    #[test]
    fn accepts_sequences_drawn_from_alphabet(
        (molecule, seq) in molecule().prop_flat_map(|m| {
            let letters = alphabet(m);
            (Just(m), prop::collection::vec(prop::sample::select(letters), 1..200))
        })
    ) {
        prop_assert!(check_residues(&seq, molecule).is_valid());
    }

    #[test]
    fn rejects_any_foreign_character(
        (molecule, seq, foreign, pos) in molecule().prop_flat_map(|m| {
            let letters = alphabet(m);
            let foreign: Vec<u8> = (0u8..=127).filter(|c| !letters.contains(c)).collect();
            (
                Just(m),
                prop::collection::vec(prop::sample::select(letters), 0..100),
                prop::sample::select(foreign),
                any::<prop::sample::Index>(),
            )
        })
    ) {
        let mut seq = seq;
        let at = pos.index(seq.len() + 1);
        seq.insert(at, foreign);
        let report = check_residues(&seq, molecule);
        prop_assert!(!report.is_valid());
        prop_assert!(report.invalid.iter().any(|r| r.position == at + 1 && r.residue == foreign as char));
    }
}
