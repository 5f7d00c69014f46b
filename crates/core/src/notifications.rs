//! In-memory feed of device notifications, newest first.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::EngineAction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub time: DateTime<Utc>,
}

/// Events reported by the vehicle or the paired watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceEvent {
    EngineLockedFromWatch,
    EngineUnlockedFromWatch,
    ProximityAlert,
    WearDeviceConnected,
}

impl DeviceEvent {
    pub const ALL: [DeviceEvent; 4] = [
        DeviceEvent::EngineLockedFromWatch,
        DeviceEvent::EngineUnlockedFromWatch,
        DeviceEvent::ProximityAlert,
        DeviceEvent::WearDeviceConnected,
    ];

    /// Snake-case name, as serialized.
    pub fn name(self) -> &'static str {
        match self {
            DeviceEvent::EngineLockedFromWatch => "engine_locked_from_watch",
            DeviceEvent::EngineUnlockedFromWatch => "engine_unlocked_from_watch",
            DeviceEvent::ProximityAlert => "proximity_alert",
            DeviceEvent::WearDeviceConnected => "wear_device_connected",
        }
    }

    fn title(self) -> &'static str {
        match self {
            DeviceEvent::EngineLockedFromWatch | DeviceEvent::EngineUnlockedFromWatch => "Motor",
            DeviceEvent::ProximityAlert => "Proximidad",
            DeviceEvent::WearDeviceConnected => "Conexión",
        }
    }

    fn message(self) -> &'static str {
        match self {
            DeviceEvent::EngineLockedFromWatch => "Se bloqueó el motor desde el reloj",
            DeviceEvent::EngineUnlockedFromWatch => "Se desbloqueó el motor desde el reloj",
            DeviceEvent::ProximityAlert => "¡Alguien está muy cerca del carro!",
            DeviceEvent::WearDeviceConnected => "Se conectó a un dispositivo Wear OS",
        }
    }
}

impl FromStr for DeviceEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|event| event.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|event| event.name()).collect();
                format!("unknown device event '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

#[derive(Debug, Clone)]
pub struct NotificationFeed {
    items: Vec<Notification>,
    next_id: u64,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, title: impl Into<String>, message: impl Into<String>) -> &Notification {
        let notification = Notification {
            id: self.next_id.to_string(),
            title: title.into(),
            message: message.into(),
            time: Utc::now(),
        };
        self.next_id += 1;
        self.items.insert(0, notification);
        &self.items[0]
    }

    pub fn push_event(&mut self, event: DeviceEvent) -> &Notification {
        self.push(event.title(), event.message())
    }

    /// Record a committed engine toggle.
    pub fn push_engine_action(&mut self, action: EngineAction) -> &Notification {
        self.push("Motor", action.done_message())
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every notification. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
