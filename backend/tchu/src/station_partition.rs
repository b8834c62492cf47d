use crate::error::{check_index, GameResult};
use crate::station::{Station, StationConnectivity};

/// A flattened partition of stations: each entry holds the representative of its subset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StationPartition {
    representatives: Vec<usize>,
}

impl StationConnectivity for StationPartition {
    /// Two stations are connected when they share a representative. A station outside of the
    /// partition is only connected to itself.
    fn connected(&self, s1: Station, s2: Station) -> bool {
        if s1 == s2 {
            return true;
        }
        match (
            self.representatives.get(s1.id()),
            self.representatives.get(s2.id()),
        ) {
            (Some(rep1), Some(rep2)) => rep1 == rep2,
            _ => false,
        }
    }
}

/// Builds a [`StationPartition`] by connecting stations one pair at a time.
#[derive(Debug)]
pub struct StationPartitionBuilder {
    representatives: Vec<usize>,
}

impl StationPartitionBuilder {
    /// A builder for stations with ids in `0..station_count`, each in its own subset.
    ///
    /// # Example
    /// ```
    /// use tchu::station::{Station, StationConnectivity};
    /// use tchu::station_partition::StationPartitionBuilder;
    ///
    /// let mut builder = StationPartitionBuilder::new(10);
    /// builder.connect(Station::Atlanta, Station::Boston).unwrap();
    /// builder.connect(Station::Boston, Station::Chicago).unwrap();
    /// let partition = builder.build();
    /// assert!(partition.connected(Station::Atlanta, Station::Chicago));
    /// assert!(!partition.connected(Station::Atlanta, Station::Dallas));
    /// ```
    pub fn new(station_count: usize) -> Self {
        Self {
            representatives: (0..station_count).collect(),
        }
    }

    /// Joins the subsets of both stations.
    ///
    /// Returns an `Err` if either station is outside of the builder's range.
    pub fn connect(&mut self, s1: Station, s2: Station) -> GameResult<&mut Self> {
        let len = self.representatives.len();
        let rep1 = self.representative(check_index(s1.id(), len)?);
        let rep2 = self.representative(check_index(s2.id(), len)?);
        self.representatives[rep2] = rep1;
        Ok(self)
    }

    fn representative(&self, id: usize) -> usize {
        let mut current = id;
        while self.representatives[current] != current {
            current = self.representatives[current];
        }
        current
    }

    /// Flattens every subset so that each entry points directly to its root.
    pub fn build(mut self) -> StationPartition {
        for id in 0..self.representatives.len() {
            self.representatives[id] = self.representative(id);
        }
        StationPartition {
            representatives: self.representatives,
        }
    }
}
