use crate::route::Route;
use crate::station::Station;

use smallvec::SmallVec;
use std::fmt;

/// A simple path through routes claimed by a single player.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trail {
    /// The routes of the trail, in travel order from `station1` to `station2`.
    routes: Vec<Route>,
    /// `None` for the empty trail.
    ends: Option<(Station, Station)>,
    length: u32,
}

/// A trail under construction, referring to routes by their position in the input.
struct Candidate {
    route_indices: SmallVec<[usize; 8]>,
    start: Station,
    end: Station,
    length: u32,
}

impl Candidate {
    fn seed(index: usize, route: &Route, start: Station, end: Station) -> Self {
        Self {
            route_indices: smallvec![index],
            start,
            end,
            length: route.length() as u32,
        }
    }

    /// Every candidate obtained by adding one unused route at the open end of this one.
    fn extensions(&self, routes: &[Route]) -> Vec<Candidate> {
        routes
            .iter()
            .enumerate()
            .filter(|(index, route)| !self.route_indices.contains(index) && route.touches(self.end))
            .filter_map(|(index, route)| {
                let end = route.station_opposite(self.end).ok()?;
                let mut route_indices = self.route_indices.clone();
                route_indices.push(index);
                Some(Candidate {
                    route_indices,
                    start: self.start,
                    end,
                    length: self.length + route.length() as u32,
                })
            })
            .collect()
    }
}

impl Trail {
    /// The longest trail that can be made with the given routes.
    ///
    /// Trails are grown one route at a time, one generation after the other, until no trail of
    /// the current generation can be extended. When several trails share the maximum length, the
    /// first one found wins: trails seeded from earlier routes come first, and each route seeds
    /// its `station1` to `station2` direction before the opposite one.
    ///
    /// # Example
    /// ```
    /// use tchu::map::Map;
    /// use tchu::station::Station;
    /// use tchu::trail::Trail;
    ///
    /// let map = Map::standard();
    /// let routes: Vec<_> = map
    ///     .routes()
    ///     .iter()
    ///     .filter(|route| route.id() == "BOS_NYC_1" || route.id() == "NYC_WAS_1")
    ///     .cloned()
    ///     .collect();
    /// let trail = Trail::longest(&routes);
    /// assert_eq!(trail.length(), 4);
    /// ```
    pub fn longest(routes: &[Route]) -> Trail {
        let mut generation: Vec<Candidate> = routes
            .iter()
            .enumerate()
            .flat_map(|(index, route)| {
                [
                    Candidate::seed(index, route, route.station1(), route.station2()),
                    Candidate::seed(index, route, route.station2(), route.station1()),
                ]
            })
            .collect();

        let mut longest: Option<Candidate> = None;
        while !generation.is_empty() {
            let mut next_generation = Vec::new();
            for candidate in generation {
                next_generation.extend(candidate.extensions(routes));
                if longest
                    .as_ref()
                    .map_or(true, |best| candidate.length > best.length)
                {
                    longest = Some(candidate);
                }
            }
            generation = next_generation;
        }

        match longest {
            Some(candidate) => Trail {
                routes: candidate
                    .route_indices
                    .iter()
                    .map(|index| routes[*index].clone())
                    .collect(),
                ends: Some((candidate.start, candidate.end)),
                length: candidate.length,
            },
            None => Trail::default(),
        }
    }

    /// The sum of the lengths of the routes of the trail.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Where the trail starts, or `None` if it is empty.
    #[inline]
    pub fn station1(&self) -> Option<Station> {
        self.ends.map(|(start, _)| start)
    }

    /// Where the trail ends, or `None` if it is empty.
    #[inline]
    pub fn station2(&self) -> Option<Station> {
        self.ends.map(|(_, end)| end)
    }

    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl fmt::Display for Trail {
    /// Lists the stations of the trail, e.g. `Boston - New York - Washington`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((start, _)) = self.ends else {
            return Ok(());
        };

        write!(f, "{}", start)?;
        let mut current = start;
        for route in &self.routes {
            current = route.station_opposite(current).map_err(|_| fmt::Error)?;
            write!(f, " - {}", current)?;
        }
        Ok(())
    }
}
