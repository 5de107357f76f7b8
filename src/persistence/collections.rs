use super::storage::Storage;
use crate::domain::{CalendarEvent, MindMap, NodeColor, PomodoroSettings};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

pub const EVENTS_KEY: &str = "calendar-events";
pub const MAPS_KEY: &str = "mind-maps";
pub const CURRENT_MAP_KEY: &str = "current-map-id";
pub const NODE_COLOR_KEY: &str = "selected-node-color";
pub const POMODORO_KEY: &str = "pomodoro-settings";

/// Everything the application keeps in storage
#[derive(Debug, Clone, Default)]
pub struct LoadedState {
    pub events: Vec<CalendarEvent>,
    pub maps: Vec<MindMap>,
    pub current_map_id: Option<Uuid>,
    pub node_color: NodeColor,
    pub pomodoro: PomodoroSettings,
    /// Keys whose stored blob was malformed and has been dropped
    pub discarded: Vec<&'static str>,
}

/// Load a blob, discarding it entirely if it no longer parses
fn load_or_discard<T, S>(
    storage: &mut S,
    key: &'static str,
    discarded: &mut Vec<&'static str>,
) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("event=storage_discard key={} error={}", key, e);
            storage.remove(key)?;
            discarded.push(key);
            Ok(None)
        }
    }
}

fn save<T, S>(storage: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", key))?;
    storage
        .set(key, &json)
        .with_context(|| format!("Failed to save {}", key))
}

/// Load every collection. Malformed blobs are dropped and reported in
/// `discarded`; storage I/O failures are errors.
pub fn load_all<S: Storage + ?Sized>(storage: &mut S) -> Result<LoadedState> {
    let mut discarded = Vec::new();

    let events: Vec<CalendarEvent> =
        load_or_discard(storage, EVENTS_KEY, &mut discarded)?.unwrap_or_default();
    let maps: Vec<MindMap> =
        load_or_discard(storage, MAPS_KEY, &mut discarded)?.unwrap_or_default();
    let current_map_id: Option<Uuid> = load_or_discard(storage, CURRENT_MAP_KEY, &mut discarded)?;
    let node_color: NodeColor =
        load_or_discard(storage, NODE_COLOR_KEY, &mut discarded)?.unwrap_or_default();
    let pomodoro: PomodoroSettings =
        load_or_discard(storage, POMODORO_KEY, &mut discarded)?.unwrap_or_default();

    // Out-of-range settings are treated like malformed ones
    let pomodoro = if pomodoro.validate().is_ok() {
        pomodoro
    } else {
        log::warn!("event=storage_discard key={} error=invalid_settings", POMODORO_KEY);
        storage.remove(POMODORO_KEY)?;
        discarded.push(POMODORO_KEY);
        PomodoroSettings::default()
    };

    Ok(LoadedState {
        events,
        maps,
        current_map_id,
        node_color,
        pomodoro,
        discarded,
    })
}

/// Read the events collection without touching anything else in storage.
/// A malformed blob is an error here and is left in place.
pub fn load_events<S: Storage + ?Sized>(storage: &S) -> Result<Vec<CalendarEvent>> {
    let Some(raw) = storage.get(EVENTS_KEY)? else {
        return Ok(Vec::new());
    };
    serde_json::from_str(&raw).with_context(|| format!("Stored {} is malformed", EVENTS_KEY))
}

pub fn save_events<S: Storage + ?Sized>(storage: &mut S, events: &[CalendarEvent]) -> Result<()> {
    save(storage, EVENTS_KEY, events)
}

pub fn save_maps<S: Storage + ?Sized>(storage: &mut S, maps: &[MindMap]) -> Result<()> {
    save(storage, MAPS_KEY, maps)
}

pub fn save_current_map_id<S: Storage + ?Sized>(storage: &mut S, id: Uuid) -> Result<()> {
    save(storage, CURRENT_MAP_KEY, &id)
}

pub fn save_node_color<S: Storage + ?Sized>(storage: &mut S, color: NodeColor) -> Result<()> {
    save(storage, NODE_COLOR_KEY, &color)
}

pub fn save_pomodoro_settings<S: Storage + ?Sized>(
    storage: &mut S,
    settings: &PomodoroSettings,
) -> Result<()> {
    save(storage, POMODORO_KEY, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mindmap::MindMapNode;
    use crate::domain::EventDraft;
    use crate::persistence::storage::{FileStorage, MemoryStorage};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn sample_event(title: &str) -> CalendarEvent {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        CalendarEvent::from_draft(EventDraft::on(title, date)).unwrap()
    }

    #[test]
    fn test_load_empty_storage_gives_defaults() {
        let mut storage = MemoryStorage::new();
        let loaded = load_all(&mut storage).unwrap();

        assert!(loaded.events.is_empty());
        assert!(loaded.maps.is_empty());
        assert_eq!(loaded.current_map_id, None);
        assert_eq!(loaded.node_color, NodeColor::Blue);
        assert_eq!(loaded.pomodoro, PomodoroSettings::default());
        assert!(loaded.discarded.is_empty());
    }

    #[test]
    fn test_round_trip_through_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(temp_dir.path()).unwrap();

        let events = vec![sample_event("One"), sample_event("Two")];
        let mut map = MindMap::new("Ideas");
        map.nodes.push(MindMapNode::centered_at(0.0, 0.0, NodeColor::Green));

        save_events(&mut storage, &events).unwrap();
        save_maps(&mut storage, std::slice::from_ref(&map)).unwrap();
        save_current_map_id(&mut storage, map.id).unwrap();
        save_node_color(&mut storage, NodeColor::Orange).unwrap();

        let loaded = load_all(&mut storage).unwrap();
        assert_eq!(loaded.events, events);
        assert_eq!(loaded.maps, vec![map.clone()]);
        assert_eq!(loaded.current_map_id, Some(map.id));
        assert_eq!(loaded.node_color, NodeColor::Orange);
    }

    #[test]
    fn test_invalid_date_discards_whole_collection() {
        let mut storage = MemoryStorage::new();
        let good = serde_json::to_value(sample_event("Good")).unwrap();
        let mut bad = serde_json::to_value(sample_event("Bad")).unwrap();
        bad["dueDate"] = serde_json::Value::String("not-a-date".to_string());
        storage
            .set(EVENTS_KEY, &serde_json::to_string(&vec![good, bad]).unwrap())
            .unwrap();
        save_node_color(&mut storage, NodeColor::Pink).unwrap();

        let loaded = load_all(&mut storage).unwrap();

        assert!(loaded.events.is_empty());
        assert_eq!(loaded.discarded, vec![EVENTS_KEY]);
        assert_eq!(storage.get(EVENTS_KEY).unwrap(), None);
        // Other collections are unaffected
        assert_eq!(loaded.node_color, NodeColor::Pink);
    }

    #[test]
    fn test_invalid_pomodoro_settings_reset() {
        let mut storage = MemoryStorage::new();
        storage.set(POMODORO_KEY, r#"{"workMinutes": 0}"#).unwrap();

        let loaded = load_all(&mut storage).unwrap();
        assert_eq!(loaded.pomodoro, PomodoroSettings::default());
        assert_eq!(loaded.discarded, vec![POMODORO_KEY]);
    }

    #[test]
    fn test_load_events_reads_only_events() {
        let mut storage = MemoryStorage::new();
        save_events(&mut storage, &[sample_event("Kept")]).unwrap();
        storage.set(MAPS_KEY, "{ broken").unwrap();

        let events = load_events(&storage).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Kept");
        assert_eq!(storage.get(MAPS_KEY).unwrap().as_deref(), Some("{ broken"));
    }

    #[test]
    fn test_load_events_rejects_malformed_blob() {
        let mut storage = MemoryStorage::new();
        storage.set(EVENTS_KEY, "[{").unwrap();

        let err = load_events(&storage).unwrap_err();
        assert!(format!("{:#}", err).contains(EVENTS_KEY));
        assert_eq!(storage.get(EVENTS_KEY).unwrap().as_deref(), Some("[{"));
    }
}
