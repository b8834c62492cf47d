use crate::error::{check_argument, GameResult};
use crate::station::{Station, StationConnectivity};

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A trip from one station to another, worth some points if both are connected.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Trip {
    from: Station,
    to: Station,
    points: u32,
}

impl Trip {
    /// Creates a trip. Returns an `Err` if `points` is zero.
    pub fn new(from: Station, to: Station, points: u32) -> GameResult<Self> {
        check_argument(points > 0, || {
            format!("The trip from {} to {} must be worth points.", from, to)
        })?;
        Ok(Self { from, to, points })
    }

    /// Every trip going from any of `from` to any of `to`, all worth the same points.
    pub fn all(from: &[Station], to: &[Station], points: u32) -> GameResult<Vec<Trip>> {
        let mut trips = Vec::with_capacity(from.len() * to.len());
        for departure in from {
            for arrival in to {
                trips.push(Trip::new(*departure, *arrival, points)?);
            }
        }
        Ok(trips)
    }

    #[inline]
    pub fn from(&self) -> Station {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Station {
        self.to
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// The points of the trip if its stations are connected, or their opposite otherwise.
    pub fn signed_points(&self, connectivity: &impl StationConnectivity) -> i32 {
        let points = self.points as i32;
        if connectivity.connected(self.from, self.to) {
            points
        } else {
            -points
        }
    }
}

/// An objective held by a player: one or more trips sharing the same departure.
///
/// Tickets are identified, compared and ordered by their text.
#[derive(Clone, Debug)]
pub struct Ticket {
    trips: SmallVec<[Trip; 1]>,
    text: String,
}

impl Ticket {
    /// Creates a ticket from trips which all leave from the same station.
    ///
    /// # Example
    /// ```
    /// use tchu::station::Station;
    /// use tchu::ticket::{Ticket, Trip};
    ///
    /// let trips = vec![
    ///     Trip::new(Station::Denver, Station::Seattle, 11).unwrap(),
    ///     Trip::new(Station::Denver, Station::Boston, 15).unwrap(),
    /// ];
    /// let ticket = Ticket::new(trips).unwrap();
    /// assert_eq!(ticket.text(), "Denver - {Boston (15), Seattle (11)}");
    /// ```
    pub fn new(trips: Vec<Trip>) -> GameResult<Self> {
        check_argument(!trips.is_empty(), || {
            "A ticket needs at least one trip.".to_string()
        })?;
        let from = trips[0].from().name();
        check_argument(
            trips.iter().all(|trip| trip.from().name() == from),
            || format!("All the trips of a ticket must leave from {}.", from),
        )?;

        let text = Self::compute_text(&trips);
        Ok(Self {
            trips: trips.into(),
            text,
        })
    }

    /// A ticket with a single trip.
    pub fn single(from: Station, to: Station, points: u32) -> GameResult<Self> {
        Self::new(vec![Trip::new(from, to, points)?])
    }

    fn compute_text(trips: &[Trip]) -> String {
        let destinations: BTreeSet<String> = trips
            .iter()
            .map(|trip| format!("{} ({})", trip.to(), trip.points()))
            .collect();
        let destinations = destinations.into_iter().collect::<Vec<_>>().join(", ");

        if trips.len() == 1 {
            format!("{} - {}", trips[0].from(), destinations)
        } else {
            format!("{} - {{{}}}", trips[0].from(), destinations)
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// The points this ticket is worth for a network with the given connectivity.
    ///
    /// If any trip is connected, this is the best of the connected trips.
    /// Otherwise, this is the opposite of the cheapest trip.
    pub fn points(&self, connectivity: &impl StationConnectivity) -> i32 {
        let best_connected = self
            .trips
            .iter()
            .map(|trip| trip.signed_points(connectivity))
            .filter(|points| *points > 0)
            .max();

        match best_connected {
            Some(points) => points,
            None => {
                let cheapest = self.trips.iter().map(Trip::points).min().unwrap_or(0);
                -(cheapest as i32)
            }
        }
    }
}

impl PartialEq for Ticket {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Ticket {}

impl Hash for Ticket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for Ticket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ticket {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
