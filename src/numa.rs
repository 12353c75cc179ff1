//! NUMA placement table for victim selection.
//!
//! The thread-pool collaborator knows which core each team member is pinned
//! to; this table is its export of that knowledge: for every NUMA node the
//! team indices resident there, and for every team member its node and its
//! position within the node. The scheduler itself never queries the OS, and
//! without a table victim selection falls back to uniform draws over the
//! whole team.

/// Team-to-NUMA-node assignment for one team.
pub struct NumaTopology {
    /// Team indices resident on each node.
    nodes: Vec<Vec<usize>>,
    /// Node of each team member.
    node_of: Vec<usize>,
    /// Position of each team member within its node's member list.
    index_in_node: Vec<usize>,
}

impl NumaTopology {
    /// Build the table from a per-team-member node assignment. Node ids must
    /// be dense (`0..num_nodes`).
    pub fn from_node_ids(node_of: &[usize]) -> Self {
        assert!(!node_of.is_empty(), "a topology covers at least one worker");

        let num_nodes = node_of.iter().copied().max().unwrap() + 1;
        let mut nodes = vec![Vec::new(); num_nodes];
        let mut index_in_node = Vec::with_capacity(node_of.len());

        for (team_id, &node) in node_of.iter().enumerate() {
            index_in_node.push(nodes[node].len());
            nodes[node].push(team_id);
        }

        Self {
            nodes,
            node_of: node_of.to_vec(),
            index_in_node,
        }
    }

    /// A degenerate topology placing the whole team on one node.
    pub fn single_node(nthreads: usize) -> Self {
        Self::from_node_ids(&vec![0; nthreads])
    }

    /// How many workers the table covers.
    pub fn team_size(&self) -> usize {
        self.node_of.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node_of(&self, team_id: usize) -> usize {
        self.node_of[team_id]
    }

    pub(crate) fn node_members(&self, node: usize) -> &[usize] {
        &self.nodes[node]
    }

    pub(crate) fn index_in_node(&self, team_id: usize) -> usize {
        self.index_in_node[team_id]
    }
}
