//! What a compiled circuit has to fit: a gate set and qubit connectivity.

use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};

/// Every gate name the compiler can emit.
const EMITTABLE: [&str; 15] = [
    "id", "x", "y", "z", "h", "s", "sdg", "sx", "sxdg", "rx", "ry", "rz", "p", "cx", "cz",
];

/// The gates a compiled circuit may contain. Measurements and barriers are
/// always allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisGates {
    gates: Vec<String>,
}

impl BasisGates {
    /// Parse user-supplied names, case-insensitively, dropping duplicates.
    pub fn from_names(names: impl IntoIterator<Item = impl AsRef<str>>) -> CompileResult<Self> {
        let mut gates: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_ascii_lowercase();
            if !EMITTABLE.contains(&name.as_str()) {
                return Err(CompileError::UnknownBasisGate(name));
            }
            if !gates.contains(&name) {
                gates.push(name);
            }
        }
        Ok(Self { gates })
    }

    /// `cx`, `id`, `rz`, `sx`, `x`.
    pub fn ibm() -> Self {
        Self::trusted(&["cx", "id", "rz", "sx", "x"])
    }

    /// Everything the IR defines.
    pub fn universal() -> Self {
        Self::trusted(&EMITTABLE)
    }

    fn trusted(names: &[&str]) -> Self {
        Self {
            gates: names.iter().map(|&n| n.to_owned()).collect(),
        }
    }

    pub fn contains(&self, gate: &str) -> bool {
        self.gates.iter().any(|g| g == gate)
    }

    pub fn gates(&self) -> &[String] {
        &self.gates
    }
}

/// Pairs of physical qubits that may share a two-qubit gate, in either
/// direction.
#[derive(Debug, Clone)]
pub struct CouplingMap {
    num_qubits: u32,
    graph: UnGraphMap<u32, ()>,
}

impl CouplingMap {
    /// `num_qubits` qubits with no couplings.
    pub fn new(num_qubits: u32) -> Self {
        let mut graph = UnGraphMap::with_capacity(num_qubits as usize, 0);
        for q in 0..num_qubits {
            graph.add_node(q);
        }
        Self { num_qubits, graph }
    }

    /// A chain `0 - 1 - ... - n-1`.
    pub fn linear(num_qubits: u32) -> Self {
        let mut map = Self::new(num_qubits);
        for q in 1..num_qubits {
            map.add_edge(q - 1, q);
        }
        map
    }

    /// Every pair coupled.
    pub fn full(num_qubits: u32) -> Self {
        let mut map = Self::new(num_qubits);
        for a in 0..num_qubits {
            for b in a + 1..num_qubits {
                map.add_edge(a, b);
            }
        }
        map
    }

    /// Couple `a` and `b`; repeated pairs are ignored.
    pub fn add_edge(&mut self, a: u32, b: u32) {
        self.num_qubits = self.num_qubits.max(a.max(b) + 1);
        self.graph.add_edge(a, b, ());
    }

    #[inline]
    pub fn is_connected(&self, a: u32, b: u32) -> bool {
        self.graph.contains_edge(a, b)
    }

    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Coupled pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.graph.all_edges().map(|(a, b, _)| (a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_parsing() {
        let basis = BasisGates::from_names(["CX", " rz", "sx", "rz"]).unwrap();
        assert_eq!(basis.gates(), ["cx", "rz", "sx"]);
        assert!(matches!(
            BasisGates::from_names(["cx", "ecr"]),
            Err(CompileError::UnknownBasisGate(name)) if name == "ecr"
        ));
        assert!(BasisGates::universal().contains("p"));
        assert!(!BasisGates::ibm().contains("h"));
    }

    #[test]
    fn test_linear_map() {
        let line = CouplingMap::linear(4);
        assert_eq!(line.edges().count(), 3);
        assert!(line.is_connected(2, 1));
        assert!(!line.is_connected(0, 2));
    }

    #[test]
    fn test_full_map_ignores_duplicates() {
        let mut full = CouplingMap::full(4);
        full.add_edge(3, 0);
        assert_eq!(full.edges().count(), 6);
        assert_eq!(full.num_qubits(), 4);
        assert_eq!(CouplingMap::full(1).edges().count(), 0);
    }
}
