use phf::{Map, phf_map};

#[rustfmt::skip]
static ATOMIC_NUMBERS: Map<&'static str, u8> = phf_map! {
    "H" => 1, "He" => 2,
    "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9, "Ne" => 10,
    "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15, "S" => 16, "Cl" => 17, "Ar" => 18,
    "K" => 19, "Ca" => 20, "Sc" => 21, "Ti" => 22, "V" => 23, "Cr" => 24, "Mn" => 25, "Fe" => 26,
    "Co" => 27, "Ni" => 28, "Cu" => 29, "Zn" => 30, "Ga" => 31, "Ge" => 32, "As" => 33, "Se" => 34,
    "Br" => 35, "Kr" => 36,
    "Rb" => 37, "Sr" => 38, "Y" => 39, "Zr" => 40, "Nb" => 41, "Mo" => 42, "Tc" => 43, "Ru" => 44,
    "Rh" => 45, "Pd" => 46, "Ag" => 47, "Cd" => 48, "In" => 49, "Sn" => 50, "Sb" => 51, "Te" => 52,
    "I" => 53, "Xe" => 54,
    "Cs" => 55, "Ba" => 56, "La" => 57, "Gd" => 64, "Hf" => 72, "Ta" => 73, "W" => 74, "Re" => 75,
    "Os" => 76, "Ir" => 77, "Pt" => 78, "Au" => 79, "Hg" => 80, "Tl" => 81, "Pb" => 82, "Bi" => 83,
    "Po" => 84, "At" => 85, "Rn" => 86, "Fr" => 87, "Ra" => 88, "U" => 92,
};

// Bondi radii (Angstrom), keyed by upper-case symbol.
#[rustfmt::skip]
static VDW_RADII: Map<&'static str, f64> = phf_map! {
    "H" => 1.10, "HE" => 1.40,
    "LI" => 1.82, "BE" => 1.53, "B" => 1.92, "C" => 1.70, "N" => 1.55, "O" => 1.52, "F" => 1.47, "NE" => 1.54,
    "NA" => 2.27, "MG" => 1.73, "AL" => 1.84, "SI" => 2.10, "P" => 1.80, "S" => 1.80, "CL" => 1.75, "AR" => 1.88,
    "K" => 2.75, "CA" => 2.31, "NI" => 1.63, "CU" => 1.40, "ZN" => 1.39, "GA" => 1.87, "GE" => 2.11,
    "AS" => 1.85, "SE" => 1.90, "BR" => 1.85, "KR" => 2.02,
    "RB" => 3.03, "SR" => 2.49, "PD" => 1.63, "AG" => 1.72, "CD" => 1.58, "IN" => 1.93, "SN" => 2.17,
    "SB" => 2.06, "TE" => 2.06, "I" => 1.98, "XE" => 2.16,
    "CS" => 3.43, "BA" => 2.68, "PT" => 1.75, "AU" => 1.66, "HG" => 1.55, "TL" => 1.96, "PB" => 2.02,
    "BI" => 2.07, "PO" => 1.97, "AT" => 2.02, "RN" => 2.20, "FR" => 3.48, "RA" => 2.83, "U" => 1.86,
};

/// Returns the atomic number for a case-sensitive element symbol (e.g. `"Cl"`).
pub fn atomic_number(symbol: &str) -> Option<u8> {
    ATOMIC_NUMBERS.get(symbol).copied()
}

/// Normalizes an element symbol to its canonical capitalization (`"CL"` -> `"Cl"`).
pub fn canonical_symbol(symbol: &str) -> Option<String> {
    let trimmed = symbol.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?.to_ascii_uppercase();
    let rest: String = chars.map(|c| c.to_ascii_lowercase()).collect();
    let candidate = format!("{first}{rest}");
    ATOMIC_NUMBERS.contains_key(candidate.as_str()).then_some(candidate)
}

/// Returns the van der Waals radius of an element, case-insensitively.
pub fn vdw_radius(symbol: &str) -> Option<f64> {
    VDW_RADII
        .get(symbol.trim().to_ascii_uppercase().as_str())
        .copied()
}
