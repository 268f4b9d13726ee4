use crate::canvas::ZoomPanSettings;
use crate::topology::{InstanceDocument, TopologyDocument};
use crate::validation::ServerError;
use serde::{Deserialize, Serialize};

/// The name a message or event travels under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    SaveGraph,
    SaveInstance,
    SaveAndActivate,
    NameAvailableCheck,
    GetInitialData,
    CloseWindow,
    SetInitialData,
    SaveSucceeded,
    FailedOperationReason,
}

/// Which editor page the host opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageType {
    #[default]
    #[serde(rename = "graphPage")]
    Topology,
    #[serde(rename = "instancePage")]
    Instance,
}

/// Messages sent from the editor core to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data", rename_all = "camelCase")]
pub enum HostMessage {
    SaveGraph(TopologyDocument),
    SaveInstance(InstanceDocument),
    SaveAndActivate(InstanceDocument),
    NameAvailableCheck(String),
    GetInitialData,
    CloseWindow,
}

impl HostMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            HostMessage::SaveGraph(_) => MessageKind::SaveGraph,
            HostMessage::SaveInstance(_) => MessageKind::SaveInstance,
            HostMessage::SaveAndActivate(_) => MessageKind::SaveAndActivate,
            HostMessage::NameAvailableCheck(_) => MessageKind::NameAvailableCheck,
            HostMessage::GetInitialData => MessageKind::GetInitialData,
            HostMessage::CloseWindow => MessageKind::CloseWindow,
        }
    }
}

/// Events delivered by the host to the editor core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data", rename_all = "camelCase")]
pub enum HostEvent {
    SetInitialData(InitialData),
    NameAvailableCheck(bool),
    SaveSucceeded,
    FailedOperationReason(Vec<ServerError>),
}

impl HostEvent {
    pub fn kind(&self) -> MessageKind {
        match self {
            HostEvent::SetInitialData(_) => MessageKind::SetInitialData,
            HostEvent::NameAvailableCheck(_) => MessageKind::NameAvailableCheck,
            HostEvent::SaveSucceeded => MessageKind::SaveSucceeded,
            HostEvent::FailedOperationReason(_) => MessageKind::FailedOperationReason,
        }
    }
}

/// What the host hands over when the editor opens.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialData {
    #[serde(default)]
    pub page_type: PageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<TopologyDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<InstanceDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_pan_settings: Option<ZoomPanSettings>,
    /// Set when an existing topology is reopened; its name can no longer change.
    #[serde(default)]
    pub edit_mode: bool,
}

impl InitialData {
    pub fn topology(topology: TopologyDocument) -> Self {
        Self {
            page_type: PageType::Topology,
            topology: Some(topology),
            ..Self::default()
        }
    }

    pub fn instance(topology: TopologyDocument, instance: InstanceDocument) -> Self {
        Self {
            page_type: PageType::Instance,
            topology: Some(topology),
            instance: Some(instance),
            ..Self::default()
        }
    }
}
