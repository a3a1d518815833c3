use std::collections::HashMap;
use termion::event::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    Noop,
    NextDay,
    PrevDay,
    NextWeek,
    PrevWeek,
    FirstWeek,
    LastWeek,
    Refresh,
    Exit,
}

pub type KeyMap = HashMap<Key, Cmd>;

pub fn default_key_map() -> KeyMap {
    let mut key_map = HashMap::new();

    key_map.insert(Key::Char('l'), Cmd::NextWeek);
    key_map.insert(Key::Right, Cmd::NextWeek);
    key_map.insert(Key::Char('h'), Cmd::PrevWeek);
    key_map.insert(Key::Left, Cmd::PrevWeek);
    key_map.insert(Key::Char('j'), Cmd::NextDay);
    key_map.insert(Key::Down, Cmd::NextDay);
    key_map.insert(Key::Char('k'), Cmd::PrevDay);
    key_map.insert(Key::Up, Cmd::PrevDay);
    key_map.insert(Key::Char('g'), Cmd::FirstWeek);
    key_map.insert(Key::Char('G'), Cmd::LastWeek);
    key_map.insert(Key::Char('r'), Cmd::Refresh);
    key_map.insert(Key::Char('q'), Cmd::Exit);
    key_map.insert(Key::Esc, Cmd::Exit);
    key_map.insert(Key::Ctrl('c'), Cmd::Exit);

    key_map
}

pub fn lookup(key_map: &KeyMap, key: &Key) -> Cmd {
    key_map.get(key).copied().unwrap_or(Cmd::Noop)
}
