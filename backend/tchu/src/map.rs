use crate::bag::SortedBag;
use crate::card::Color;
use crate::error::{check_argument, GameResult};
use crate::route::{Level, Route};
use crate::station::Station;
use crate::ticket::{Ticket, Trip};

use std::collections::HashSet;
use std::sync::Arc;

lazy_static! {
    // The built-in catalog is made of constants, and its construction is covered by tests.
    static ref STANDARD_MAP: Arc<Map> =
        Arc::new(Map::build_standard().expect("the standard map is valid"));
}

/// The catalog of a game: every route that can be claimed and every ticket that can be drawn.
///
/// Both sides of a connection must share the same catalog, as routes and tickets are exchanged
/// by their position in it.
#[derive(Debug, PartialEq)]
pub struct Map {
    routes: Vec<Route>,
    tickets: SortedBag<Ticket>,
}

/// A short code for each station, used to build route ids.
fn code(station: Station) -> &'static str {
    match station {
        Station::Atlanta => "ATL",
        Station::Boston => "BOS",
        Station::Calgary => "CAL",
        Station::Charleston => "CHS",
        Station::Chicago => "CHI",
        Station::Dallas => "DAL",
        Station::Denver => "DEN",
        Station::Duluth => "DUL",
        Station::ElPaso => "ELP",
        Station::Helena => "HEL",
        Station::Houston => "HOU",
        Station::KansasCity => "KAN",
        Station::LasVegas => "LVG",
        Station::LittleRock => "LRK",
        Station::LosAngeles => "LAX",
        Station::Miami => "MIA",
        Station::Montreal => "MTL",
        Station::Nashville => "NAS",
        Station::NewOrleans => "NOR",
        Station::NewYork => "NYC",
        Station::OklahomaCity => "OKC",
        Station::Omaha => "OMA",
        Station::Phoenix => "PHX",
        Station::Pittsburgh => "PIT",
        Station::Portland => "POR",
        Station::Raleigh => "RAL",
        Station::SaintLouis => "STL",
        Station::SaltLakeCity => "SLC",
        Station::SanFrancisco => "SFO",
        Station::SantaFe => "SFE",
        Station::SaultStMarie => "SSM",
        Station::Seattle => "SEA",
        Station::Toronto => "TOR",
        Station::Vancouver => "VAN",
        Station::Washington => "WAS",
        Station::Winnipeg => "WIN",
    }
}

/// Adds one route per color between `station1` and `station2`, numbered from 1.
fn add_parallel_routes(
    routes: &mut Vec<Route>,
    level: Level,
    (station1, station2): (Station, Station),
    length: u8,
    colors: &[Option<Color>],
) -> GameResult<()> {
    for (index, color) in colors.iter().enumerate() {
        let id = format!("{}_{}_{}", code(station1), code(station2), index + 1);
        routes.push(Route::new(id, station1, station2, length, level, *color)?);
    }
    Ok(())
}

/// Convenience macro to generate "parallel" routes between two stations.
/// `Wild` stands for a route which any color can claim.
macro_rules! parallel_routes {
    (@color Wild) => {
        None
    };
    (@color $color:ident) => {
        Some(Color::$color)
    };
    ($routes:ident, $level:ident, $station1:ident - $station2:ident, $length:literal, $($color:ident),+) => {
        add_parallel_routes(
            &mut $routes,
            Level::$level,
            (Station::$station1, Station::$station2),
            $length,
            &[$(parallel_routes!(@color $color)),+],
        )?
    };
}

/// Convenience macro to generate a ticket, with one or several destinations.
macro_rules! ticket {
    ($from:ident => $to:ident, $points:literal) => {
        Ticket::single(Station::$from, Station::$to, $points)?
    };
    ($from:ident => {$($to:ident: $points:literal),+}) => {
        Ticket::new(vec![$(Trip::new(Station::$from, Station::$to, $points)?),+])?
    };
}

impl Map {
    /// Returns an `Err` if two routes share an id, or if two tickets share a text.
    pub fn new(routes: Vec<Route>, tickets: Vec<Ticket>) -> GameResult<Self> {
        let mut route_ids = HashSet::new();
        for route in &routes {
            check_argument(route_ids.insert(route.id()), || {
                format!("Route {} appears twice.", route.id())
            })?;
        }
        let ticket_count = tickets.len();
        let tickets: SortedBag<Ticket> = tickets.into_iter().collect();
        check_argument(tickets.distinct().len() == ticket_count, || {
            "Tickets must be unique.".to_string()
        })?;

        Ok(Self { routes, tickets })
    }

    /// The North-American map, shared by every game that uses it.
    ///
    /// # Example
    /// ```
    /// use tchu::map::Map;
    ///
    /// let map = Map::standard();
    /// assert_eq!(map.routes().len(), 100);
    /// assert!(map.route("DEN_SLC_2").unwrap().is_tunnel());
    /// ```
    pub fn standard() -> Arc<Map> {
        Arc::clone(&STANDARD_MAP)
    }

    /// Every route, in catalog order.
    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Every ticket, in catalog order.
    #[inline]
    pub fn tickets(&self) -> &SortedBag<Ticket> {
        &self.tickets
    }

    /// The route with the given id, if any.
    pub fn route(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.id() == id)
    }

    fn build_standard() -> GameResult<Map> {
        let mut routes = Vec::with_capacity(100);

        // Atlanta.
        parallel_routes!(routes, Overground, Atlanta - Charleston, 2, Wild);
        parallel_routes!(routes, Overground, Atlanta - Miami, 5, Blue);
        parallel_routes!(routes, Overground, Atlanta - Nashville, 1, Wild);
        parallel_routes!(routes, Overground, Atlanta - NewOrleans, 5, Orange, Yellow);
        parallel_routes!(routes, Overground, Atlanta - Raleigh, 2, Wild, Wild);
        // Boston.
        parallel_routes!(routes, Overground, Boston - Montreal, 2, Wild, Wild);
        parallel_routes!(routes, Overground, Boston - NewYork, 2, Yellow, Red);
        // Calgary.
        parallel_routes!(routes, Underground, Calgary - Helena, 4, Wild);
        parallel_routes!(routes, Underground, Calgary - Seattle, 4, Wild);
        parallel_routes!(routes, Underground, Calgary - Vancouver, 3, Wild);
        parallel_routes!(routes, Overground, Calgary - Winnipeg, 6, White);
        // Charleston.
        parallel_routes!(routes, Overground, Charleston - Miami, 4, Pink);
        parallel_routes!(routes, Overground, Charleston - Raleigh, 2, Wild);
        // Chicago.
        parallel_routes!(routes, Overground, Chicago - Duluth, 3, Red);
        parallel_routes!(routes, Overground, Chicago - Omaha, 4, Blue);
        parallel_routes!(routes, Overground, Chicago - Pittsburgh, 3, Black, Orange);
        parallel_routes!(routes, Overground, Chicago - SaintLouis, 2, Green, White);
        parallel_routes!(routes, Overground, Chicago - Toronto, 4, White);
        // Dallas.
        parallel_routes!(routes, Overground, Dallas - ElPaso, 4, Red);
        parallel_routes!(routes, Overground, Dallas - Houston, 1, Wild, Wild);
        parallel_routes!(routes, Overground, Dallas - LittleRock, 2, Wild);
        parallel_routes!(routes, Overground, Dallas - OklahomaCity, 2, Wild, Wild);
        // Denver.
        parallel_routes!(routes, Underground, Denver - Helena, 4, Green);
        parallel_routes!(routes, Overground, Denver - KansasCity, 4, Black, Orange);
        parallel_routes!(routes, Overground, Denver - OklahomaCity, 4, Red);
        parallel_routes!(routes, Overground, Denver - Omaha, 4, Pink);
        parallel_routes!(routes, Underground, Denver - Phoenix, 5, White);
        parallel_routes!(routes, Underground, Denver - SaltLakeCity, 3, Red, Yellow);
        parallel_routes!(routes, Underground, Denver - SantaFe, 2, Wild);
        // Duluth.
        parallel_routes!(routes, Overground, Duluth - Helena, 6, Orange);
        parallel_routes!(routes, Overground, Duluth - Omaha, 2, Wild, Wild);
        parallel_routes!(routes, Overground, Duluth - SaultStMarie, 3, Wild);
        parallel_routes!(routes, Overground, Duluth - Toronto, 6, Pink);
        parallel_routes!(routes, Overground, Duluth - Winnipeg, 4, Black);
        // El Paso.
        parallel_routes!(routes, Overground, ElPaso - Houston, 6, Green);
        parallel_routes!(routes, Overground, ElPaso - LosAngeles, 6, Black);
        parallel_routes!(routes, Overground, ElPaso - OklahomaCity, 5, Yellow);
        parallel_routes!(routes, Overground, ElPaso - Phoenix, 3, Wild);
        parallel_routes!(routes, Overground, ElPaso - SantaFe, 2, Wild);
        // Helena.
        parallel_routes!(routes, Overground, Helena - Omaha, 5, Red);
        parallel_routes!(routes, Underground, Helena - SaltLakeCity, 3, Pink);
        parallel_routes!(routes, Underground, Helena - Seattle, 6, Yellow);
        parallel_routes!(routes, Overground, Helena - Winnipeg, 4, Blue);
        // Houston.
        parallel_routes!(routes, Overground, Houston - NewOrleans, 2, Wild);
        // Kansas City.
        parallel_routes!(routes, Overground, KansasCity - SaintLouis, 2, Blue, Pink);
        parallel_routes!(routes, Overground, KansasCity - OklahomaCity, 2, Wild, Wild);
        parallel_routes!(routes, Overground, KansasCity - Omaha, 1, Wild, Wild);
        // Las Vegas.
        parallel_routes!(routes, Overground, LasVegas - LosAngeles, 2, Wild);
        parallel_routes!(routes, Underground, LasVegas - SaltLakeCity, 3, Orange);
        // Little Rock.
        parallel_routes!(routes, Overground, LittleRock - Nashville, 3, White);
        parallel_routes!(routes, Overground, LittleRock - NewOrleans, 3, Wild);
        parallel_routes!(routes, Overground, LittleRock - OklahomaCity, 2, Wild);
        parallel_routes!(routes, Overground, LittleRock - SaintLouis, 2, Wild);
        // Los Angeles.
        parallel_routes!(routes, Overground, LosAngeles - Phoenix, 3, Wild);
        parallel_routes!(routes, Overground, LosAngeles - SanFrancisco, 3, Pink, Yellow);
        // Miami.
        parallel_routes!(routes, Overground, Miami - NewOrleans, 6, Red);
        // Montréal.
        parallel_routes!(routes, Overground, Montreal - NewYork, 3, Blue);
        parallel_routes!(routes, Overground, Montreal - SaultStMarie, 5, Black);
        parallel_routes!(routes, Overground, Montreal - Toronto, 3, Wild);
        // Nashville.
        parallel_routes!(routes, Overground, Nashville - Pittsburgh, 4, Yellow);
        parallel_routes!(routes, Overground, Nashville - Raleigh, 3, Black);
        parallel_routes!(routes, Overground, Nashville - SaintLouis, 2, Wild);
        // New York.
        parallel_routes!(routes, Overground, NewYork - Pittsburgh, 2, Green, White);
        parallel_routes!(routes, Overground, NewYork - Washington, 2, Black, Orange);
        // Oklahoma City.
        parallel_routes!(routes, Overground, OklahomaCity - SantaFe, 3, Blue);
        // Phoenix.
        parallel_routes!(routes, Overground, Phoenix - SantaFe, 3, Wild);
        // Pittsburgh.
        parallel_routes!(routes, Overground, Pittsburgh - Raleigh, 2, Wild);
        parallel_routes!(routes, Overground, Pittsburgh - SaintLouis, 5, Green);
        parallel_routes!(routes, Overground, Pittsburgh - Toronto, 2, Wild);
        parallel_routes!(routes, Overground, Pittsburgh - Washington, 2, Wild);
        // Portland.
        parallel_routes!(routes, Underground, Portland - SaltLakeCity, 6, Blue);
        parallel_routes!(routes, Overground, Portland - SanFrancisco, 5, Green, Pink);
        // Raleigh.
        parallel_routes!(routes, Overground, Raleigh - Washington, 2, Wild, Wild);
        // Salt Lake City.
        parallel_routes!(routes, Underground, SaltLakeCity - SanFrancisco, 5, Orange, White);
        // Sault St. Marie.
        parallel_routes!(routes, Overground, SaultStMarie - Toronto, 2, Wild);
        parallel_routes!(routes, Overground, SaultStMarie - Winnipeg, 6, Wild);
        // Seattle.
        parallel_routes!(routes, Overground, Seattle - Portland, 1, Wild, Wild);
        parallel_routes!(routes, Overground, Seattle - Vancouver, 1, Wild, Wild);

        let tickets = vec![
            ticket!(Boston => Miami, 12),
            ticket!(Calgary => Phoenix, 13),
            ticket!(Calgary => SaltLakeCity, 7),
            ticket!(Chicago => NewOrleans, 7),
            ticket!(Chicago => SantaFe, 9),
            ticket!(Dallas => NewYork, 11),
            ticket!(Denver => ElPaso, 4),
            ticket!(Denver => Pittsburgh, 11),
            ticket!(Duluth => ElPaso, 10),
            ticket!(Duluth => Houston, 8),
            ticket!(Helena => LosAngeles, 8),
            ticket!(KansasCity => Houston, 5),
            ticket!(LosAngeles => Chicago, 16),
            ticket!(LosAngeles => Miami, 20),
            ticket!(LosAngeles => NewYork, 21),
            ticket!(Montreal => Atlanta, 9),
            ticket!(Montreal => NewOrleans, 13),
            ticket!(NewYork => Atlanta, 6),
            ticket!(Portland => Nashville, 17),
            ticket!(Portland => Phoenix, 11),
            ticket!(SanFrancisco => Atlanta, 17),
            ticket!(SaultStMarie => Nashville, 8),
            ticket!(SaultStMarie => OklahomaCity, 9),
            ticket!(Seattle => LosAngeles, 9),
            ticket!(Seattle => NewYork, 22),
            ticket!(Toronto => Miami, 10),
            ticket!(Vancouver => Montreal, 20),
            ticket!(Vancouver => SantaFe, 13),
            ticket!(Winnipeg => Houston, 12),
            ticket!(Winnipeg => LittleRock, 11),
            // Several destinations: only the best connected one counts.
            ticket!(Denver => {Boston: 15, Seattle: 11, Miami: 17}),
            ticket!(Winnipeg => {Atlanta: 14, Dallas: 12}),
            ticket!(Chicago => {LosAngeles: 16, Seattle: 14, Houston: 9}),
            // Any of the east coast harbors.
            Ticket::new(Trip::all(
                &[Station::Vancouver],
                &[Station::Boston, Station::NewYork, Station::Washington, Station::Charleston],
                21,
            )?)?,
        ];

        Map::new(routes, tickets)
    }
}
