#![allow(dead_code)]

use ifprint::core::models::builder::MoleculeBuilder;
use ifprint::core::models::molecule::Molecule;
use ifprint::core::models::topology::BondOrder;
use nalgebra::{Point3, Vector3};

const RING_RADIUS: f64 = 1.39;
const RING_H_RADIUS: f64 = 2.48;
const NH_LENGTH: f64 = 1.03;
const CH_LENGTH: f64 = 1.09;

pub fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
    Point3::new(x, y, z)
}

/// Builds a molecule from `(element, position, formal charge)` records.
pub fn molecule(atoms: &[(&str, Point3<f64>, i8)], bonds: &[(usize, usize, BondOrder)]) -> Molecule {
    let mut builder = MoleculeBuilder::new();
    for (i, &(element, position, charge)) in atoms.iter().enumerate() {
        builder
            .add_atom(&format!("{}{}", element.to_uppercase(), i + 1), element, position)
            .with_charge(charge);
    }
    for &(a, b, order) in bonds {
        builder.add_bond(a, b, order);
    }
    builder.build().unwrap()
}

/// Six-membered aromatic ring with one hydrogen per ring atom.
///
/// Ring atom `k` sits at angle `phase + 60k` degrees in the plane spanned by
/// `u` and `v`. Atom 0 is `first_element` with `first_charge`; the rest are
/// carbons.
pub fn aromatic_hexagon(
    center: Point3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
    phase: f64,
    first_element: &str,
    first_charge: i8,
) -> Molecule {
    let direction = |k: usize| {
        let theta = (phase + 60.0 * k as f64).to_radians();
        u * theta.cos() + v * theta.sin()
    };

    let mut builder = MoleculeBuilder::new();
    for k in 0..6 {
        let element = if k == 0 { first_element } else { "C" };
        let charge = if k == 0 { first_charge } else { 0 };
        builder
            .add_atom(&format!("{}{}", element.to_uppercase(), k + 1), element, center + direction(k) * RING_RADIUS)
            .with_charge(charge)
            .aromatic();
    }
    for k in 0..6 {
        builder.add_atom(&format!("H{}", k + 1), "H", center + direction(k) * RING_H_RADIUS);
    }
    for k in 0..6 {
        builder
            .add_bond(k, (k + 1) % 6, BondOrder::Aromatic)
            .add_bond(k, k + 6, BondOrder::Single);
    }
    builder.build().unwrap()
}

/// Benzene in the xy-plane, centered on the origin.
pub fn benzene() -> Molecule {
    aromatic_hexagon(Point3::origin(), Vector3::x(), Vector3::y(), 0.0, "C", 0)
}

/// Benzene stacked parallel 3.8 A above [`benzene`].
pub fn ftf() -> Molecule {
    aromatic_hexagon(p(0.0, 0.0, 3.8), Vector3::x(), Vector3::y(), 0.0, "C", 0)
}

/// Benzene in the xz-plane centered at z = 5, one C-H pointing at [`benzene`].
pub fn etf() -> Molecule {
    aromatic_hexagon(p(0.0, 0.0, 5.0), Vector3::x(), Vector3::z(), 30.0, "C", 0)
}

/// Ammonium ion 3.5 A above the center of [`benzene`].
pub fn cation() -> Molecule {
    let n = p(0.0, 0.0, 3.5);
    let directions = [
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(0.943, 0.0, -0.333),
        Vector3::new(-0.471, 0.816, -0.333),
        Vector3::new(-0.471, -0.816, -0.333),
    ];
    let mut atoms = vec![("N", n, 1)];
    atoms.extend(directions.iter().map(|d| ("H", n + d * NH_LENGTH, 0)));
    let bonds: Vec<_> = (1..=4).map(|h| (0, h, BondOrder::Single)).collect();
    molecule(&atoms, &bonds)
}

/// Pyridinium 3.5 A above [`benzene`]; its charge sits on an aromatic atom.
pub fn cation_false() -> Molecule {
    aromatic_hexagon(p(0.0, 0.0, 3.5), Vector3::x(), Vector3::y(), 0.0, "N", 1)
}

/// Chloride 3.0 A above [`cation`].
pub fn anion() -> Molecule {
    molecule(&[("Cl", p(0.0, 0.0, 6.5), -1)], &[])
}

/// Chloromethane above [`benzene`], methyl group first.
pub fn chlorine() -> Molecule {
    let c = p(0.0, 0.0, 4.0);
    let down = [
        Vector3::new(0.943, 0.0, -0.333),
        Vector3::new(-0.471, 0.816, -0.333),
        Vector3::new(-0.471, -0.816, -0.333),
    ];
    let mut atoms = vec![("C", c, 0), ("Cl", p(0.0, 0.0, 5.77), 0)];
    atoms.extend(down.iter().map(|d| ("H", c + d * CH_LENGTH, 0)));
    let mut bonds = vec![(0, 1, BondOrder::Single)];
    bonds.extend((2..=4).map(|h| (0, h, BondOrder::Single)));
    molecule(&atoms, &bonds)
}

fn formaldehyde(o: Point3<f64>, c: Point3<f64>, h1: Point3<f64>, h2: Point3<f64>) -> Molecule {
    molecule(
        &[("O", o, 0), ("C", c, 0), ("H", h1, 0), ("H", h2, 0)],
        &[
            (0, 1, BondOrder::Double),
            (1, 2, BondOrder::Single),
            (1, 3, BondOrder::Single),
        ],
    )
}

fn water(o: Point3<f64>, h1: Point3<f64>, h2: Point3<f64>) -> Molecule {
    molecule(
        &[("O", o, 0), ("H", h1, 0), ("H", h2, 0)],
        &[(0, 1, BondOrder::Single), (0, 2, BondOrder::Single)],
    )
}

pub fn hb_acceptor() -> Molecule {
    formaldehyde(
        p(20.0, 0.0, 0.0),
        p(18.79, 0.0, 0.0),
        p(18.23, 0.94, 0.0),
        p(18.23, -0.94, 0.0),
    )
}

/// Water whose first O-H points straight at the oxygen of [`hb_acceptor`].
pub fn hb_donor() -> Molecule {
    water(p(22.9, 0.0, 0.0), p(21.94, 0.0, 0.0), p(23.14, 0.93, 0.0))
}

/// Acceptor within reach of [`hb_donor`] but off its O-H axes.
pub fn hb_acceptor_false() -> Molecule {
    formaldehyde(
        p(22.9, -3.0, 0.0),
        p(22.9, -4.21, 0.0),
        p(23.84, -4.77, 0.0),
        p(21.96, -4.77, 0.0),
    )
}

/// Chloromethane with the C-Cl bond along +x.
pub fn xb_donor() -> Molecule {
    molecule(
        &[
            ("C", p(40.0, 0.0, 0.0), 0),
            ("Cl", p(41.77, 0.0, 0.0), 0),
            ("H", p(39.636, 1.028, 0.0), 0),
            ("H", p(39.636, -0.513, 0.889), 0),
            ("H", p(39.636, -0.513, -0.889), 0),
        ],
        &[
            (0, 1, BondOrder::Single),
            (0, 2, BondOrder::Single),
            (0, 3, BondOrder::Single),
            (0, 4, BondOrder::Single),
        ],
    )
}

/// Carbonyl oxygen on the C-Cl axis of [`xb_donor`], C=O at 120 degrees.
pub fn xb_acceptor() -> Molecule {
    formaldehyde(
        p(44.87, 0.0, 0.0),
        p(45.475, 1.048, 0.0),
        p(46.565, 1.048, 0.0),
        p(44.93, 1.992, 0.0),
    )
}

/// Carbonyl oxygen on the C-Cl axis of [`xb_donor`], C=O collinear with it.
pub fn xb_acceptor_false_xar() -> Molecule {
    formaldehyde(
        p(44.87, 0.0, 0.0),
        p(46.08, 0.0, 0.0),
        p(46.625, 0.944, 0.0),
        p(46.625, -0.944, 0.0),
    )
}

/// Carbonyl oxygen beside the chlorine of [`xb_donor`], perpendicular to C-Cl.
pub fn xb_acceptor_false_axd() -> Molecule {
    formaldehyde(
        p(41.77, 3.1, 0.0),
        p(40.722, 3.705, 0.0),
        p(40.722, 4.795, 0.0),
        p(39.778, 3.16, 0.0),
    )
}

pub fn metal() -> Molecule {
    molecule(&[("Mg", p(60.0, 0.0, 0.0), 2)], &[])
}

pub fn metal_false() -> Molecule {
    molecule(&[("Mg", p(60.0, -3.5, 0.0), 2)], &[])
}

/// Water coordinating [`metal`] at 2.1 A.
pub fn ligand() -> Molecule {
    water(p(62.1, 0.0, 0.0), p(62.34, 0.93, 0.0), p(62.34, -0.93, 0.0))
}

/// Looks up a fixture by name.
pub fn fixture(name: &str) -> Molecule {
    match name {
        "benzene" => benzene(),
        "ftf" => ftf(),
        "etf" => etf(),
        "cation" => cation(),
        "cation_false" => cation_false(),
        "anion" => anion(),
        "chlorine" => chlorine(),
        "hb_acceptor" => hb_acceptor(),
        "hb_donor" => hb_donor(),
        "hb_acceptor_false" => hb_acceptor_false(),
        "xb_donor" => xb_donor(),
        "xb_acceptor" => xb_acceptor(),
        "xb_acceptor_false_xar" => xb_acceptor_false_xar(),
        "xb_acceptor_false_axd" => xb_acceptor_false_axd(),
        "metal" => metal(),
        "metal_false" => metal_false(),
        "ligand" => ligand(),
        other => panic!("no fixture named `{other}`"),
    }
}

/// Parses a heavy-atom spec: lower case means aromatic, each trailing `+` or
/// `-` adds one unit of charge (`"n+"`, `"O-"`, `"Ca++"`).
fn heavy_atom(spec: &str) -> (&str, bool, i8) {
    let symbol = spec.trim_end_matches(['+', '-']);
    let charge = spec[symbol.len()..]
        .chars()
        .map(|c| if c == '+' { 1 } else { -1 })
        .sum();
    let aromatic = symbol.starts_with(|c: char| c.is_ascii_lowercase());
    (symbol, aromatic, charge)
}

/// A molecular graph for substructure tests, without meaningful coordinates.
///
/// `heavy` lists `(spec, hydrogen count)`; hydrogens are added as explicit
/// atoms after the heavy atoms.
pub fn graph(heavy: &[(&str, usize)], bonds: &[(usize, usize, BondOrder)]) -> Molecule {
    let mut builder = MoleculeBuilder::new();
    for (i, &(spec, _)) in heavy.iter().enumerate() {
        let (symbol, aromatic, charge) = heavy_atom(spec);
        builder
            .add_atom(&format!("A{i}"), symbol, p(i as f64 * 1.5, 0.0, 0.0))
            .with_charge(charge);
        if aromatic {
            builder.aromatic();
        }
    }
    for &(a, b, order) in bonds {
        builder.add_bond(a, b, order);
    }
    let mut next = heavy.len();
    for (i, &(_, hydrogens)) in heavy.iter().enumerate() {
        for _ in 0..hydrogens {
            builder
                .add_atom(&format!("H{next}"), "H", p(i as f64 * 1.5, 1.0, 0.0))
                .add_bond(i, next, BondOrder::Single);
            next += 1;
        }
    }
    builder.build().unwrap()
}

/// Aromatic ring bonds closing `0..n` into a cycle.
pub fn ring_bonds(n: usize) -> Vec<(usize, usize, BondOrder)> {
    (0..n).map(|k| (k, (k + 1) % n, BondOrder::Aromatic)).collect()
}

/// An unbranched chain of `len` carbons, as a stand-in for a large ligand.
pub fn carbon_chain(len: usize) -> Molecule {
    let mut builder = MoleculeBuilder::new();
    for i in 0..len {
        builder.add_atom(&format!("C{i}"), "C", p(i as f64 * 1.5, 0.0, 0.0));
    }
    for i in 1..len {
        builder.add_bond(i - 1, i, BondOrder::Single);
    }
    builder.build().unwrap()
}
