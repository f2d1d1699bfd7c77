use chrono::{DateTime, Utc};
use tracing::{debug, info};
use weather_core::{FavouritesStore, FetchOutcome, SortMode, WeatherSnapshot};

/// Longest city name the input line accepts.
pub const MAX_INPUT_CHARS: usize = 200;

/// What the results pane shows this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Weather(Box<WeatherSnapshot>),
    /// The sticky invalid-data flag is set.
    Invalid,
    /// Nothing fetched yet.
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FavouritesPopup {
    pub selected: usize,
}

/// Render-loop state. Owned by the UI thread; the worker only talks to it
/// through [`FetchOutcome`]s.
#[derive(Debug)]
pub struct App {
    input: String,
    last_payload: String,
    in_flight: Option<String>,
    last_update: Option<DateTime<Utc>>,
    invalid_data: bool,
    favourites: FavouritesStore,
    sort_mode: SortMode,
    popup: Option<FavouritesPopup>,
    should_quit: bool,
}

impl App {
    pub fn new(favourites: FavouritesStore) -> Self {
        Self {
            input: String::new(),
            last_payload: String::new(),
            in_flight: None,
            last_update: None,
            invalid_data: false,
            favourites,
            sort_mode: SortMode::default(),
            popup: None,
            should_quit: false,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, ch: char) {
        if self.input.chars().count() < MAX_INPUT_CHARS {
            self.input.push(ch);
        }
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn favourites(&self) -> &FavouritesStore {
        &self.favourites
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn popup(&self) -> Option<FavouritesPopup> {
        self.popup
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Returns the query to hand to the fetch worker.
    pub fn search(&mut self) -> String {
        let query = self.input.trim().to_string();
        self.invalid_data = false;
        self.in_flight = (!query.is_empty()).then(|| query.clone());
        info!(query, "search submitted");
        query
    }

    pub fn on_outcome(&mut self, outcome: FetchOutcome) {
        if self.in_flight.as_deref() == Some(outcome.query.as_str()) {
            self.in_flight = None;
        }
        self.last_update = Some(outcome.fetched_at);
        self.last_payload = outcome.payload;
    }

    /// Decode the last payload for this frame and update the sticky flag.
    pub fn refresh_view(&mut self) -> ResultView {
        if self.last_payload.is_empty() {
            return if self.invalid_data { ResultView::Invalid } else { ResultView::Prompt };
        }

        match WeatherSnapshot::decode(&self.last_payload) {
            Ok(snapshot) => {
                self.invalid_data = false;
                ResultView::Weather(Box::new(snapshot))
            }
            Err(err) => {
                if !self.invalid_data {
                    debug!(error = %err, "payload not displayable");
                }
                self.invalid_data = true;
                ResultView::Invalid
            }
        }
    }

    /// Snapshot the typed label and the last payload into the favourites.
    pub fn add_favourite(&mut self) -> bool {
        let label = self.input.trim();
        if label.is_empty() {
            return false;
        }

        info!(label, "adding favourite");
        self.favourites.add(label, self.last_payload.clone());
        self.favourites.sort(self.sort_mode);
        true
    }

    /// The list is re-sorted so it always matches the selected mode.
    pub fn open_favourites(&mut self) {
        self.favourites.sort(self.sort_mode);
        self.popup = Some(FavouritesPopup::default());
    }

    pub fn close_favourites(&mut self) {
        self.popup = None;
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.favourites.len();
        if let Some(popup) = self.popup.as_mut() {
            if len == 0 {
                popup.selected = 0;
                return;
            }
            popup.selected = popup.selected.saturating_add_signed(delta).min(len - 1);
        }
    }

    pub fn set_sort(&mut self, mode: SortMode) {
        self.sort_mode = mode;
        self.favourites.sort(mode);
        debug!(%mode, "favourites sorted");
    }

    pub fn cycle_sort(&mut self) {
        self.set_sort(self.sort_mode.next());
    }

    /// Remove the selected row's label. With duplicate labels the first
    /// match goes, which may not be the highlighted row.
    pub fn remove_selected(&mut self) -> bool {
        let Some(popup) = self.popup else {
            return false;
        };
        let Some(label) = self.favourites.entries().get(popup.selected).map(|f| f.label.clone())
        else {
            return false;
        };

        let removed = self.favourites.remove(&label);
        self.move_selection(0);
        removed
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use weather_core::FETCH_FAILED;

    pub fn london_payload(temp_c: f64) -> String {
        format!(
            r#"{{"location":{{"name":"London","region":"England","country":"UK"}},
                "current":{{"temp_c":{temp_c},"condition":{{"text":"Sunny"}},"humidity":40,
                "wind_kph":9.5,"wind_dir":"S","pressure_mb":1020.0,"precip_mm":0.0,"cloud":10}}}}"#
        )
    }

    pub fn outcome(query: &str, payload: &str) -> FetchOutcome {
        FetchOutcome { query: query.into(), payload: payload.into(), fetched_at: Utc::now() }
    }

    pub fn app_in(dir: &tempfile::TempDir) -> App {
        App::new(FavouritesStore::load(dir.path().join("favourites.json")))
    }

    fn type_str(app: &mut App, text: &str) {
        text.chars().for_each(|c| app.push_char(c));
    }

    #[test]
    fn starts_with_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        assert_eq!(app.refresh_view(), ResultView::Prompt);
    }

    #[test]
    fn successful_outcome_shows_weather() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_str(&mut app, " London ");

        assert_eq!(app.search(), "London");
        assert_eq!(app.in_flight(), Some("London"));

        app.on_outcome(outcome("London", &london_payload(32.0)));
        assert_eq!(app.in_flight(), None);
        assert!(app.last_update().is_some());

        match app.refresh_view() {
            ResultView::Weather(snap) => assert_eq!(format!("{:.2}", snap.current.temp_c), "32.00"),
            other => panic!("expected weather, got {other:?}"),
        }
    }

    #[test]
    fn failed_fetch_sets_sticky_flag_until_search() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_str(&mut app, "Atlantis");
        app.search();

        app.on_outcome(outcome("Atlantis", FETCH_FAILED));
        assert_eq!(app.refresh_view(), ResultView::Invalid);
        assert_eq!(app.refresh_view(), ResultView::Invalid);

        app.search();
        app.on_outcome(outcome("Atlantis", ""));
        assert_eq!(app.refresh_view(), ResultView::Prompt);
    }

    #[test]
    fn good_payload_clears_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        app.on_outcome(outcome("x", "{}"));
        assert_eq!(app.refresh_view(), ResultView::Invalid);

        app.on_outcome(outcome("London", &london_payload(10.0)));
        assert!(matches!(app.refresh_view(), ResultView::Weather(_)));
    }

    #[test]
    fn stale_outcome_keeps_new_query_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_str(&mut app, "Paris");
        app.search();

        app.on_outcome(outcome("London", &london_payload(10.0)));
        assert_eq!(app.in_flight(), Some("Paris"));
    }

    #[test]
    fn add_favourite_persists_label_and_payload() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        assert!(!app.add_favourite());

        type_str(&mut app, "London");
        app.on_outcome(outcome("London", &london_payload(15.0)));
        assert!(app.add_favourite());

        let reloaded = FavouritesStore::load(dir.path().join("favourites.json"));
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.entries()[0].label, "London");
        assert_eq!(reloaded.entries()[0].payload, london_payload(15.0));
    }

    #[test]
    fn remove_selected_clamps_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        for city in ["Oslo", "Bergen"] {
            app.input.clear();
            type_str(&mut app, city);
            app.add_favourite();
        }

        assert!(!app.remove_selected());

        app.open_favourites();
        app.move_selection(5);
        assert_eq!(app.popup().unwrap().selected, 1);

        assert!(app.remove_selected());
        assert_eq!(app.favourites().len(), 1);
        assert_eq!(app.popup().unwrap().selected, 0);

        assert!(app.remove_selected());
        assert!(app.favourites().is_empty());
        assert!(!app.remove_selected());
    }

    fn labels(app: &App) -> Vec<&str> {
        app.favourites().entries().iter().map(|f| f.label.as_str()).collect()
    }

    fn add_city(app: &mut App, city: &str, temp_c: f64) {
        app.input.clear();
        type_str(app, city);
        app.on_outcome(outcome(city, &london_payload(temp_c)));
        app.add_favourite();
    }

    #[test]
    fn list_order_follows_sort_mode_on_open_and_add() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        add_city(&mut app, "Zurich", 15.0);
        add_city(&mut app, "Athens", 25.0);

        app.open_favourites();
        assert_eq!(app.sort_mode(), SortMode::Alphabetic);
        assert_eq!(labels(&app), ["Athens", "Zurich"]);

        app.set_sort(SortMode::Temperature);
        app.close_favourites();
        add_city(&mut app, "Cold", -10.0);
        assert_eq!(labels(&app), ["Cold", "Zurich", "Athens"]);

        app.open_favourites();
        assert_eq!(labels(&app), ["Cold", "Zurich", "Athens"]);

        let on_disk = FavouritesStore::load(dir.path().join("favourites.json"));
        assert_eq!(on_disk.len(), 3);
    }

    #[test]
    fn input_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_str(&mut app, &"x".repeat(MAX_INPUT_CHARS + 50));

        assert_eq!(app.input().chars().count(), MAX_INPUT_CHARS);
        app.pop_char();
        app.push_char('y');
        assert!(app.input().ends_with('y'));
    }

    #[test]
    fn cycle_sort_reorders_favourites() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        for city in ["Oslo", "Bergen"] {
            app.input.clear();
            type_str(&mut app, city);
            app.add_favourite();
        }

        app.set_sort(SortMode::Alphabetic);
        assert_eq!(app.favourites().entries()[0].label, "Bergen");

        app.cycle_sort();
        assert_eq!(app.sort_mode(), SortMode::Temperature);
    }
}
