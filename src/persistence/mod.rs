pub mod collections;
pub mod files;
pub mod storage;

pub use collections::{
    load_all, load_events, save_current_map_id, save_events, save_maps, save_node_color,
    save_pomodoro_settings,
};
pub use files::{atomic_write, ensure_dir, init_local_dir, resolve_data_dir};
pub use storage::{FileStorage, MemoryStorage, Storage};
