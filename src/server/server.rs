use bytes::Bytes;
use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use http_body_util::Full;
use hyper::{
    body::Incoming, header, service::Service, Method, Request, Response, StatusCode,
};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, error};
use url_escape::decode;

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use crate::{
    catalog::{
        bus::{self, ScheduleDay},
        category, deal, event, menu_item, pharmacy,
        service_data::{self, ServiceDataKey},
        venue, BusRoute, BusSchedule,
        Category, Deal, Event, MenuItem, OnDutyPharmacy, Pharmacy, ServiceData, Venue,
        VenueFilter,
    },
    database::sqlite::SqliteDatabase,
    locale::Locale,
    timing::local_now,
};

use super::response::{BusScheduleView, DealView, EventView, VenueDetail, VenueSummary};

type HttpResponse = Response<Full<Bytes>>;

/// The Server
///
/// Handles every API endpoint. Records come out of the local mirror through
/// `SqliteDatabase`; anything time-dependent is computed against one clock
/// reading taken when the request arrives.
///
/// Implements hyper's `Service` trait and is cloned for every connection.
#[derive(Clone)]
pub struct Server {
    connection_pool: Arc<Pool<SqliteConnectionManager>>,
    slug_sanitizer: Regex,
    timezone: Tz,
    locale: Locale,
}

impl Server {
    pub fn setup(
        connection_pool: Arc<Pool<SqliteConnectionManager>>,
        timezone: Tz,
        locale: Locale,
    ) -> Self {
        Self {
            connection_pool,
            slug_sanitizer: Regex::new(r"^[\w-]+$").expect("slug pattern compiles"),
            timezone,
            locale,
        }
    }

    /// Parses the query parameters and returns a `hashmap` of key pair values
    /// Returns `None` if the parameters are malformed
    fn parse_params(text: Option<&str>) -> Option<HashMap<String, String>> {
        let mut map: HashMap<String, String> = HashMap::new();
        let Some(text) = text.filter(|text| !text.is_empty()) else {
            return Some(map);
        };
        for pair in text.split('&') {
            let (key, value) = pair.split_once('=')?;
            map.insert(key.to_string(), decode(&value.replace('+', " ")).to_string());
        }
        Some(map)
    }

    /// Obtain a connection from the connection pool.
    fn get_connection(
        &self,
    ) -> Result<PooledConnection<SqliteConnectionManager>, HttpResponse> {
        self.connection_pool.get().map_err(|err| {
            error!("Could not get connection - Server: {}", err);
            Self::server_error("Could not reach the database")
        })
    }

    /// Routes one request. `now` is the clock reading every time-dependent
    /// field of the answer is computed against.
    pub fn respond(
        &self,
        method: &Method,
        path: &str,
        query: Option<&str>,
        now: DateTime<Tz>,
    ) -> HttpResponse {
        if method != Method::GET {
            return Self::not_found("");
        }
        let Some(params) = Self::parse_params(query) else {
            return Self::bad_request("Malformed Parameters.");
        };
        let locale = params
            .get("lang")
            .map(|lang| Locale::from_tag(lang))
            .unwrap_or(self.locale);
        let request = Query {
            params,
            locale,
            now,
        };

        let connection = match self.get_connection() {
            Ok(connection) => connection,
            Err(response) => return response,
        };

        let result = match path {
            "/api/categories" => Self::categories(&connection),
            "/api/venues" => Self::venues(&connection, &request),
            "/api/venue" => self.venue(&connection, &request),
            "/api/deals" => Self::deals(&connection, &request),
            "/api/events" => self.events(&connection, &request),
            "/api/pharmacies" => Self::pharmacies(&connection, &request),
            "/api/bus/routes" => Self::bus_routes(&connection, &request),
            "/api/bus/schedule" => Self::bus_schedule(&connection, &request),
            "/api/services" => Self::services(&connection, &request),
            _ => return Self::not_found(""),
        };

        result.unwrap_or_else(|err| {
            error!("Error answering {}: {}", path, err);
            Self::server_error(&err.to_string())
        })
    }

    /// The /api/categories endpoint. Active categories in menu order.
    fn categories(connection: &rusqlite::Connection) -> rusqlite::Result<HttpResponse> {
        let categories = SqliteDatabase::load_all::<Category>(connection)?;
        Ok(Self::ok_data(category::active_categories(categories)))
    }

    /// The /api/venues endpoint.
    ///
    /// Optional `category_id`, `featured` and `open_now` narrow the list.
    /// Every entry carries whether it is open right now.
    fn venues(
        connection: &rusqlite::Connection,
        request: &Query,
    ) -> rusqlite::Result<HttpResponse> {
        let category_id = match request.optional::<i64>("category_id") {
            Ok(id) => id,
            Err(response) => return Ok(response),
        };
        let is_featured = match request.flag("featured") {
            Ok(flag) => flag,
            Err(response) => return Ok(response),
        };
        let open_now = match request.flag("open_now") {
            Ok(flag) => flag.unwrap_or(false),
            Err(response) => return Ok(response),
        };

        let now = request.now.naive_local();
        let filter = VenueFilter {
            category_id,
            is_featured,
            open_at: open_now.then_some(now),
        };
        let venues = filter.apply(SqliteDatabase::load_all::<Venue>(connection)?);
        let result: Vec<VenueSummary> = venues
            .into_iter()
            .map(|venue| VenueSummary {
                is_open: venue.is_open(now),
                todays_hours: venue.todays_hours(now, request.locale),
                id: venue.id,
                name: venue.name,
                slug: venue.slug,
                category_id: venue.category_id,
                logo_url: venue.logo_url,
                cover_url: venue.cover_url,
                location: venue.location,
                is_featured: venue.is_featured,
            })
            .collect();
        Ok(Self::ok_data(result))
    }

    /// The /api/venue endpoint.
    ///
    /// Looks a venue up by `slug` and returns it with its category, open/closed
    /// status, the whole week's hours and its public menu.
    fn venue(
        &self,
        connection: &rusqlite::Connection,
        request: &Query,
    ) -> rusqlite::Result<HttpResponse> {
        let Some(slug) = request.params.get("slug") else {
            return Ok(Self::bad_request("slug not provided."));
        };
        // Slugs are only matched, never interpolated, but junk gets a 400
        // rather than a 404.
        if !self.slug_sanitizer.is_match(slug) {
            return Ok(Self::bad_request("Malformed Slug"));
        }

        let venues = SqliteDatabase::load_all::<Venue>(connection)?;
        let Some(venue) = venue::find_by_slug(&venues, slug) else {
            return Ok(Self::not_found("Venue not found"));
        };

        let now = request.now.naive_local();
        let category = SqliteDatabase::load_one::<Category>(connection, venue.category_id)?;
        let items = SqliteDatabase::load_all::<MenuItem>(connection)?;
        let result = VenueDetail {
            category,
            is_open: venue.is_open(now),
            week: venue.week(now, request.locale),
            menu: menu_item::venue_menu(&items, venue.id),
            venue: venue.clone(),
        };
        Ok(Self::ok_data(result))
    }

    /// The /api/deals endpoint. Running deals, soonest ending first, each with
    /// its countdown. `all=true` keeps deals that already ended.
    fn deals(connection: &rusqlite::Connection, request: &Query) -> rusqlite::Result<HttpResponse> {
        let include_ended = match request.flag("all") {
            Ok(flag) => flag.unwrap_or(false),
            Err(response) => return Ok(response),
        };

        let venue_names: HashMap<i64, String> = SqliteDatabase::load_all::<Venue>(connection)?
            .into_iter()
            .map(|venue| (venue.id, venue.name))
            .collect();
        let deals = SqliteDatabase::load_all::<Deal>(connection)?;
        let result: Vec<DealView> = deal::current_deals(deals, &request.now, include_ended)
            .into_iter()
            .map(|deal| {
                let countdown = deal.countdown(&request.now);
                DealView {
                    venue_name: venue_names.get(&deal.venue_id).cloned(),
                    remaining: countdown.label(request.locale),
                    urgency: countdown.urgency(),
                    show_badge: countdown.shows_badge(),
                    deal,
                }
            })
            .collect();
        Ok(Self::ok_data(result))
    }

    /// The /api/events endpoint. Upcoming events in date order, `all=true`
    /// includes past ones.
    fn events(
        &self,
        connection: &rusqlite::Connection,
        request: &Query,
    ) -> rusqlite::Result<HttpResponse> {
        let include_past = match request.flag("all") {
            Ok(flag) => flag.unwrap_or(false),
            Err(response) => return Ok(response),
        };

        let events = SqliteDatabase::load_all::<Event>(connection)?;
        let result: Vec<EventView> = event::upcoming_events(events, &request.now, include_past)
            .into_iter()
            .map(|event| EventView {
                display_date: event.display_date(&self.timezone, request.locale),
                display_time: event.display_time(&self.timezone),
                event,
            })
            .collect();
        Ok(Self::ok_data(result))
    }

    /// The /api/pharmacies endpoint. Pharmacies on duty today come first.
    fn pharmacies(
        connection: &rusqlite::Connection,
        request: &Query,
    ) -> rusqlite::Result<HttpResponse> {
        let pharmacies = SqliteDatabase::load_all::<Pharmacy>(connection)?;
        let duties = SqliteDatabase::load_all::<OnDutyPharmacy>(connection)?;
        let today = request.now.date_naive();
        Ok(Self::ok_data(pharmacy::pharmacy_listing(
            pharmacies, &duties, today,
        )))
    }

    /// The /api/bus/routes endpoint. Optional `q` searches route names.
    fn bus_routes(
        connection: &rusqlite::Connection,
        request: &Query,
    ) -> rusqlite::Result<HttpResponse> {
        let routes = SqliteDatabase::load_all::<BusRoute>(connection)?;
        let query = request.params.get("q").map(String::as_str).unwrap_or("");
        Ok(Self::ok_data(bus::search_routes(routes, query)))
    }

    /// The /api/bus/schedule endpoint.
    ///
    /// Requires `route_id`. Without `departure_point` the route's first stop is
    /// used, without `day` today's day category.
    fn bus_schedule(
        connection: &rusqlite::Connection,
        request: &Query,
    ) -> rusqlite::Result<HttpResponse> {
        let route_id = match request.optional::<i64>("route_id") {
            Ok(Some(id)) => id,
            Ok(None) => return Ok(Self::bad_request("route_id not provided.")),
            Err(response) => return Ok(response),
        };
        let day = match request.params.get("day") {
            None => ScheduleDay::for_weekday(request.now.weekday()),
            Some(day) => match ScheduleDay::parse(day) {
                Some(day) => day,
                None => return Ok(Self::bad_request("Malformed Day")),
            },
        };

        let schedules = SqliteDatabase::load_all::<BusSchedule>(connection)?;
        let departure_points = bus::departure_points(&schedules, route_id);
        if departure_points.is_empty() {
            return Ok(Self::no_data());
        }
        let departure_point = request
            .params
            .get("departure_point")
            .cloned()
            .or_else(|| departure_points.first().cloned());
        let departure_times =
            bus::departure_times(&schedules, route_id, departure_point.as_deref(), day);

        Ok(Self::ok_data(BusScheduleView {
            route_id,
            departure_points,
            departure_point,
            day,
            day_label: day.label(request.locale),
            days: ScheduleDay::ALL.to_vec(),
            departure_times,
        }))
    }

    /// The /api/services endpoint. Optional `key` picks one kind of entry.
    fn services(
        connection: &rusqlite::Connection,
        request: &Query,
    ) -> rusqlite::Result<HttpResponse> {
        let key = match request.optional::<ServiceDataKey>("key") {
            Ok(key) => key,
            Err(response) => return Ok(response),
        };
        let services = SqliteDatabase::load_all::<ServiceData>(connection)?;
        Ok(Self::ok_data(service_data::active_services(
            services,
            key.as_ref(),
        )))
    }

    fn json(status: StatusCode, body: Bytes) -> HttpResponse {
        let mut res = Response::new(Full::new(body));
        *res.status_mut() = status;
        res.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        res
    }

    fn error_body(message: &str) -> Bytes {
        Bytes::from(serde_json::json!({ "error": message }).to_string())
    }

    /// Return a 200 OK response with the data provided.
    fn ok_data<T: Serialize>(body: T) -> HttpResponse {
        match serde_json::to_vec(&body) {
            Ok(data) => Self::json(StatusCode::OK, Bytes::from(data)),
            Err(err) => Self::server_error(&err.to_string()),
        }
    }

    /// Return a 500 Internal Server Error response with the message provided.
    fn server_error(message: &str) -> HttpResponse {
        Self::json(StatusCode::INTERNAL_SERVER_ERROR, Self::error_body(message))
    }

    /// Return a 404 Not Found response with the message provided. The message here is optional.
    /// Leave it empty for no message.
    fn not_found(message: &str) -> HttpResponse {
        let body = if message.is_empty() {
            Bytes::new()
        } else {
            Self::error_body(message)
        };
        Self::json(StatusCode::NOT_FOUND, body)
    }

    /// Return a 400 Bad Request response with the message provided.
    fn bad_request(message: &str) -> HttpResponse {
        Self::json(StatusCode::BAD_REQUEST, Self::error_body(message))
    }

    /// Return a 204 No Content response.
    fn no_data() -> HttpResponse {
        Self::json(StatusCode::NO_CONTENT, Bytes::new())
    }
}

/// What a handler gets to see of a request.
struct Query {
    params: HashMap<String, String>,
    locale: Locale,
    now: DateTime<Tz>,
}

impl Query {
    fn optional<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, HttpResponse> {
        match self.params.get(name) {
            None => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| Server::bad_request(&format!("Malformed {}", name))),
        }
    }

    /// `true`/`1` and `false`/`0`.
    fn flag(&self, name: &str) -> Result<Option<bool>, HttpResponse> {
        match self.params.get(name).map(String::as_str) {
            None => Ok(None),
            Some("true" | "1") => Ok(Some(true)),
            Some("false" | "0") => Ok(Some(false)),
            Some(_) => Err(Server::bad_request(&format!("Malformed {}", name))),
        }
    }
}

impl Service<Request<Incoming>> for Server {
    type Response = HttpResponse;
    type Error = hyper::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let now = local_now(self.timezone);
        debug!("{} {}", req.method(), req.uri());
        let res = self.respond(req.method(), req.uri().path(), req.uri().query(), now);
        Box::pin(async { Ok(res) })
    }
}
