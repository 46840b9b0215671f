// Key binding configuration and remapping

use super::direction::{default_p1_bindings, default_p2_bindings, Direction};
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Key bindings for a single player
/// Maps physical keys to movement directions
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Player ID this config is for
    player_id: usize,

    /// Mapping from keys to directions
    bindings: HashMap<KeyCode, Direction>,

    /// Reverse mapping for quick lookups (direction -> all keys)
    direction_to_keys: HashMap<Direction, Vec<KeyCode>>,
}

impl InputConfig {
    /// Create an empty configuration
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            bindings: HashMap::new(),
            direction_to_keys: HashMap::new(),
        }
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(player_id: usize, bindings: Vec<(KeyCode, Direction)>) -> Self {
        let mut config = Self::new(player_id);
        for (key, direction) in bindings {
            config.bind(key, direction);
        }
        config
    }

    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Bind a key to a direction, replacing any previous binding of that key
    pub fn bind(&mut self, key: KeyCode, direction: Direction) {
        self.unbind_key(key);
        self.bindings.insert(key, direction);
        self.direction_to_keys
            .entry(direction)
            .or_default()
            .push(key);
    }

    pub fn unbind_key(&mut self, key: KeyCode) {
        if let Some(direction) = self.bindings.remove(&key) {
            if let Some(keys) = self.direction_to_keys.get_mut(&direction) {
                keys.retain(|k| *k != key);
                if keys.is_empty() {
                    self.direction_to_keys.remove(&direction);
                }
            }
        }
    }

    /// Unbind every key for a direction
    pub fn unbind_direction(&mut self, direction: Direction) {
        if let Some(keys) = self.direction_to_keys.remove(&direction) {
            for key in keys {
                self.bindings.remove(&key);
            }
        }
    }

    pub fn direction(&self, key: KeyCode) -> Option<Direction> {
        self.bindings.get(&key).copied()
    }

    pub fn keys(&self, direction: Direction) -> Vec<KeyCode> {
        self.direction_to_keys
            .get(&direction)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_bound(&self, key: KeyCode) -> bool {
        self.bindings.contains_key(&key)
    }

    pub fn has_binding(&self, direction: Direction) -> bool {
        self.direction_to_keys.contains_key(&direction)
    }

    pub fn all_bindings(&self) -> Vec<(KeyCode, Direction)> {
        self.bindings.iter().map(|(k, d)| (*k, *d)).collect()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
        self.direction_to_keys.clear();
    }

    /// Reset to the default bindings for this player
    pub fn reset_to_defaults(&mut self) {
        self.clear();
        let defaults = match self.player_id {
            0 => default_p1_bindings(),
            1 => default_p2_bindings(),
            _ => Vec::new(), // further players start unbound
        };
        for (key, direction) in defaults {
            self.bind(key, direction);
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        let mut config = Self::new(0);
        config.reset_to_defaults();
        config
    }
}

/// Key bindings for every local player
#[derive(Debug, Clone)]
pub struct InputConfigManager {
    configs: Vec<InputConfig>,
}

impl InputConfigManager {
    /// Create default configurations for `max_players` players
    pub fn new(max_players: usize) -> Self {
        let configs = (0..max_players)
            .map(|player_id| {
                let mut config = InputConfig::new(player_id);
                config.reset_to_defaults();
                config
            })
            .collect();

        Self { configs }
    }

    pub fn config(&self, player_id: usize) -> Option<&InputConfig> {
        self.configs.get(player_id)
    }

    pub fn config_mut(&mut self, player_id: usize) -> Option<&mut InputConfig> {
        self.configs.get_mut(player_id)
    }

    pub fn direction(&self, player_id: usize, key: KeyCode) -> Option<Direction> {
        self.config(player_id)?.direction(key)
    }

    pub fn player_count(&self) -> usize {
        self.configs.len()
    }

    pub fn reset_all_to_defaults(&mut self) {
        for config in &mut self.configs {
            config.reset_to_defaults();
        }
    }
}

impl Default for InputConfigManager {
    fn default() -> Self {
        Self::new(2)
    }
}
