//! The editing session behind one editor window.
//!
//! A session owns the document header, the current canvas snapshot and the
//! validation state, and talks to the host through a [`HostBridge`]. Every edit
//! swaps in a new `Arc<CanvasModel>`; readers take the snapshot they need and
//! re-read after the next edit instead of holding on to it.

use crate::canvas::{CanvasEdge, CanvasModel, Orientation, Position, ZoomPanSettings};
use crate::data::{sample, sample_topology};
use crate::error::{GraphError, HostError, ParameterError, SessionError};
use crate::host::{HostBridge, HostEvent, HostMessage, InitialData, MessageKind, PageType, PendingResponse};
use crate::mapper::Mapper;
use crate::parameters::ParameterSet;
use crate::schema::SchemaRegistry;
use crate::topology::{
    InstanceDocument, NodeKind, ParameterDeclaration, PropertyValue, TopologyDocument,
    TopologyHeader,
};
use crate::validation::{NameCheck, ServerError, ValidationCandidate, ValidationEngine, ValidationError};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod config;
pub mod state;

pub use config::SessionConfig;
pub use state::{SaveOutcome, SessionState};

const SAVE_RESPONSES: [MessageKind; 2] = [MessageKind::SaveSucceeded, MessageKind::FailedOperationReason];

pub struct SessionBuilder {
    bridge: HostBridge,
    registry: Option<Arc<SchemaRegistry>>,
    config: SessionConfig,
}

impl SessionBuilder {
    pub fn new(bridge: HostBridge) -> Self {
        Self {
            bridge,
            registry: None,
            config: SessionConfig::default(),
        }
    }

    /// Uses `registry` instead of the bundled node catalogue.
    pub fn with_registry(mut self, registry: impl Into<Arc<SchemaRegistry>>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.config.orientation = orientation;
        self
    }

    pub fn with_name_check(mut self, enabled: bool) -> Self {
        self.config.check_name_availability = enabled;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.config.read_only = read_only;
        self
    }

    /// Builds a session from data the caller already has.
    pub fn build(self, data: InitialData) -> Result<GraphSession, SessionError> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => Arc::new(SchemaRegistry::builtin()?),
        };
        GraphSession::from_initial_data(self.bridge, registry, self.config, data)
    }

    /// Asks the host for the initial data and builds the session from its answer.
    pub async fn start(self) -> Result<GraphSession, SessionError> {
        let pending = self
            .bridge
            .request(HostMessage::GetInitialData, &[MessageKind::SetInitialData])?;
        match pending.wait().await? {
            HostEvent::SetInitialData(data) => self.build(data),
            other => Err(HostError::UnexpectedResponse {
                expected: vec![MessageKind::SetInitialData],
                found: other.kind(),
            }
            .into()),
        }
    }
}

pub struct GraphSession {
    bridge: HostBridge,
    registry: Arc<SchemaRegistry>,
    config: SessionConfig,
    page: PageType,
    edit_mode: bool,
    header: TopologyHeader,
    canvas: Arc<CanvasModel>,
    instance: Option<InstanceDocument>,
    parameters: ParameterSet,
    zoom_pan: ZoomPanSettings,
    /// What the host handed over; restored on cancel.
    loaded: InitialData,
    engine: ValidationEngine,
    name_checks: Vec<(String, PendingResponse)>,
    state: SessionState,
}

impl GraphSession {
    pub fn builder(bridge: HostBridge) -> SessionBuilder {
        SessionBuilder::new(bridge)
    }

    /// Requests the initial data from the host and opens a session on it.
    pub async fn start(
        bridge: HostBridge,
        registry: impl Into<Arc<SchemaRegistry>>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        SessionBuilder::new(bridge)
            .with_registry(registry)
            .with_config(config)
            .start()
            .await
    }

    fn from_initial_data(
        bridge: HostBridge,
        registry: Arc<SchemaRegistry>,
        config: SessionConfig,
        mut data: InitialData,
    ) -> Result<Self, SessionError> {
        if data.topology.is_none() {
            debug!("Host sent no topology, opening the sample");
            data.topology = Some(sample_topology()?);
        }
        let mut session = Self {
            bridge,
            registry,
            config,
            page: data.page_type,
            edit_mode: data.edit_mode,
            header: TopologyHeader::default(),
            canvas: Arc::new(CanvasModel::new()),
            instance: None,
            parameters: ParameterSet::default(),
            zoom_pan: data.zoom_pan_settings.unwrap_or_default(),
            loaded: data,
            engine: ValidationEngine::new(),
            name_checks: Vec::new(),
            state: SessionState::Clean,
        };
        session.restore()?;
        info!(page = ?session.page, name = session.name(), "Graph session opened");
        Ok(session)
    }

    /// Resets the document, canvas and parameters to what was loaded.
    fn restore(&mut self) -> Result<(), SessionError> {
        let topology = self.loaded.topology.clone().unwrap_or_default();
        let canvas = self.mapper().to_canvas(&topology)?;
        self.canvas = Arc::new(canvas);
        self.header = topology.header();
        self.zoom_pan = self.loaded.zoom_pan_settings.unwrap_or_default();
        match self.page {
            PageType::Topology => {
                self.instance = None;
                self.parameters = ParameterSet::default();
            }
            PageType::Instance => {
                let instance = self
                    .loaded
                    .instance
                    .clone()
                    .unwrap_or_else(|| InstanceDocument::new("", topology.name.clone()));
                self.parameters = ParameterSet::declare(&topology, Some(&instance));
                self.instance = Some(instance);
            }
        }
        Ok(())
    }

    fn mapper(&self) -> Mapper<'_> {
        Mapper::new(&self.registry)
            .with_orientation(self.config.orientation)
            .with_spacing(self.config.spacing)
    }

    // Accessors

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn page(&self) -> PageType {
        self.page
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The name under validation: the topology name, or the instance name on
    /// instance pages.
    pub fn name(&self) -> &str {
        match (&self.page, &self.instance) {
            (PageType::Instance, Some(instance)) => &instance.name,
            _ => &self.header.name,
        }
    }

    pub fn header(&self) -> &TopologyHeader {
        &self.header
    }

    /// The current snapshot. Take a fresh one after every edit.
    pub fn canvas(&self) -> Arc<CanvasModel> {
        Arc::clone(&self.canvas)
    }

    pub fn zoom_pan(&self) -> ZoomPanSettings {
        self.zoom_pan
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn errors(&self) -> &[ValidationError] {
        self.engine.errors()
    }

    pub fn is_name_check_pending(&self) -> bool {
        self.engine.names().is_pending()
    }

    /// The host's answer for the current name; `None` until one arrived.
    pub fn name_availability(&self) -> Option<bool> {
        self.engine.names().outcome()
    }

    /// The topology as it would be saved right now.
    pub fn topology(&self) -> TopologyDocument {
        self.mapper().to_topology(&self.canvas, &self.header)
    }

    /// The instance as it would be saved right now; `None` on topology pages.
    pub fn instance(&self) -> Option<InstanceDocument> {
        self.instance.as_ref().map(|instance| {
            let mut instance = instance.clone();
            instance.properties.parameters = self.parameters.to_bindings();
            instance
        })
    }

    // State handling

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            info!(from = %self.state, to = %next, "Session state changed");
            self.state = next;
        }
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    fn ensure_page(&self, page: PageType) -> Result<(), SessionError> {
        self.ensure_open()?;
        if self.page != page {
            return Err(SessionError::WrongPage);
        }
        Ok(())
    }

    /// The canvas belongs to the topology; instance pages only bind parameters.
    fn ensure_canvas_editable(&self) -> Result<(), SessionError> {
        self.ensure_page(PageType::Topology)?;
        if self.config.read_only {
            return Err(SessionError::ReadOnly);
        }
        Ok(())
    }

    fn replace_canvas(&mut self, next: CanvasModel) {
        debug!(revision = next.revision(), "Canvas snapshot replaced");
        self.canvas = Arc::new(next);
        self.transition(SessionState::Dirty);
    }

    fn edit<F>(&mut self, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&CanvasModel) -> Result<CanvasModel, GraphError>,
    {
        self.ensure_canvas_editable()?;
        let next = edit(&self.canvas)?;
        self.replace_canvas(next);
        Ok(())
    }

    // Document edits

    /// Changes the topology (or instance) name and, on topology pages, asks the
    /// host whether the new name is free unless that answer is already known.
    pub fn set_name(&mut self, name: &str) -> Result<(), SessionError> {
        self.ensure_open()?;
        if self.config.read_only || self.edit_mode {
            return Err(SessionError::ReadOnly);
        }
        match (self.page, self.instance.as_mut()) {
            (PageType::Instance, Some(instance)) => instance.name = name.to_string(),
            _ => self.header.name = name.to_string(),
        }
        self.transition(SessionState::Dirty);
        self.check_current_name();
        Ok(())
    }

    /// Starts an availability check for the current name on new topologies.
    /// Names already answered or outstanding are not asked again.
    fn check_current_name(&mut self) {
        if self.page != PageType::Topology || !self.config.check_name_availability || self.edit_mode {
            return;
        }
        let name = self.name().to_string();
        self.request_name_check(&name);
    }

    fn request_name_check(&mut self, name: &str) {
        match self.engine.names_mut().begin(name) {
            NameCheck::Required => {
                let message = HostMessage::NameAvailableCheck(name.to_string());
                match self.bridge.request(message, &[MessageKind::NameAvailableCheck]) {
                    Ok(pending) => self.name_checks.push((name.to_string(), pending)),
                    Err(error) => {
                        warn!(name, %error, "Could not request a name availability check");
                        self.engine.names_mut().abandon(name);
                    }
                }
            }
            check => debug!(name, ?check, "No name availability request needed"),
        }
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), SessionError> {
        self.ensure_open()?;
        if self.config.read_only {
            return Err(SessionError::ReadOnly);
        }
        let description = Some(description.to_string());
        match (self.page, self.instance.as_mut()) {
            (PageType::Instance, Some(instance)) => instance.properties.description = description,
            _ => self.header.description = description,
        }
        self.transition(SessionState::Dirty);
        Ok(())
    }

    /// Renames a node. Edges reference node ids, so every edge touching it follows.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), SessionError> {
        self.edit(|canvas| canvas.renamed(old_name, new_name))
    }

    /// Replaces the types an edge carries and returns the edge as it now reads.
    pub fn reconnect(&mut self, edge_id: &str, types: Vec<String>) -> Result<CanvasEdge, SessionError> {
        self.edit(|canvas| canvas.with_edge_types(edge_id, types))?;
        self.canvas
            .edge(edge_id)
            .cloned()
            .ok_or_else(|| GraphError::EdgeNotFound(edge_id.to_string()).into())
    }

    /// Adds a node of `node_type` after every existing node. Returns its canvas id.
    pub fn add_node(&mut self, node_type: &str, name: &str) -> Result<String, SessionError> {
        self.insert_node(node_type, name, None)
    }

    /// Like [`GraphSession::add_node`], for types the registry does not describe:
    /// `kind` picks the collection the node is saved under.
    pub fn add_node_as(
        &mut self,
        kind: NodeKind,
        node_type: &str,
        name: &str,
    ) -> Result<String, SessionError> {
        self.insert_node(node_type, name, Some(kind))
    }

    fn insert_node(
        &mut self,
        node_type: &str,
        name: &str,
        kind: Option<NodeKind>,
    ) -> Result<String, SessionError> {
        self.ensure_canvas_editable()?;
        let position = self
            .canvas
            .next_free_position(self.config.orientation, &self.config.spacing);
        let (next, id) = self
            .canvas
            .with_node(&self.registry, node_type, name, kind, position);
        self.replace_canvas(next);
        Ok(id)
    }

    pub fn remove_node(&mut self, name: &str) -> Result<(), SessionError> {
        self.edit(|canvas| canvas.without_node(name))
    }

    /// Connects two nodes. Without `types` the edge carries whatever both ports share.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        types: Option<Vec<String>>,
    ) -> Result<String, SessionError> {
        self.ensure_canvas_editable()?;
        let (next, id) = self.canvas.connected(source, target, types)?;
        self.replace_canvas(next);
        Ok(id)
    }

    pub fn disconnect(&mut self, edge_id: &str) -> Result<(), SessionError> {
        self.edit(|canvas| canvas.disconnected(edge_id))
    }

    pub fn set_property(
        &mut self,
        node: &str,
        path: &[&str],
        value: Option<PropertyValue>,
    ) -> Result<(), SessionError> {
        let path: Vec<String> = path.iter().map(|part| part.to_string()).collect();
        self.edit(|canvas| canvas.with_property(node, &path, value))
    }

    pub fn move_node(&mut self, name: &str, position: Position) -> Result<(), SessionError> {
        self.edit(|canvas| canvas.moved(name, position))
    }

    /// Selection is view state: allowed on every page and never dirties the session.
    pub fn select_node(&mut self, name: Option<&str>) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.canvas = Arc::new(self.canvas.selected(name)?);
        Ok(())
    }

    /// Switches the flow direction and lays out every node again.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.config.orientation = orientation;
        self.canvas = Arc::new(self.canvas.relayout(orientation, &self.config.spacing));
        Ok(())
    }

    pub fn set_zoom_pan(&mut self, settings: ZoomPanSettings) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.zoom_pan = settings;
        Ok(())
    }

    /// Replaces the whole document, keeping positions of nodes that survive by name.
    /// Errors found on the previous document are dropped.
    pub fn replace_topology(&mut self, topology: TopologyDocument) -> Result<(), SessionError> {
        self.ensure_canvas_editable()?;
        let next = self.mapper().to_canvas_with(&topology, Some(&self.canvas))?;
        self.header = topology.header();
        self.engine.clear();
        self.replace_canvas(next);
        Ok(())
    }

    /// Replaces the document with the bundled sample called `name`.
    pub fn load_sample(&mut self, name: &str) -> Result<(), SessionError> {
        let topology =
            sample(name)?.ok_or_else(|| SessionError::UnknownSample(name.to_string()))?;
        self.replace_topology(topology)
    }

    // Parameters

    pub fn bind_parameter(&mut self, name: &str, value: &str) -> Result<(), SessionError> {
        self.ensure_page(PageType::Instance)?;
        if self.config.read_only {
            return Err(SessionError::ReadOnly);
        }
        self.parameters.bind(name, value)?;
        self.transition(SessionState::Dirty);
        Ok(())
    }

    pub fn declare_parameter(&mut self, declaration: ParameterDeclaration) -> Result<(), SessionError> {
        self.ensure_canvas_editable()?;
        if self.header.parameters.iter().any(|p| p.name == declaration.name) {
            return Err(ParameterError::AlreadyDeclared(declaration.name).into());
        }
        self.header.parameters.push(declaration);
        self.transition(SessionState::Dirty);
        Ok(())
    }

    pub fn remove_parameter(&mut self, name: &str) -> Result<(), SessionError> {
        self.ensure_canvas_editable()?;
        let index = self
            .header
            .parameters
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ParameterError::Unknown(name.to_string()))?;
        self.header.parameters.remove(index);
        self.transition(SessionState::Dirty);
        Ok(())
    }

    // Validation

    /// Applies every name answer that already arrived.
    fn drain_name_checks(&mut self) {
        let mut outstanding = Vec::with_capacity(self.name_checks.len());
        for (name, mut pending) in std::mem::take(&mut self.name_checks) {
            match pending.try_take() {
                None => outstanding.push((name, pending)),
                Some(answer) => self.apply_name_answer(&name, answer),
            }
        }
        self.name_checks = outstanding;
    }

    /// Waits until the check for the current name, if any, is answered.
    async fn await_name_check(&mut self) {
        self.drain_name_checks();
        let Some(current) = self.engine.names().current().map(str::to_string) else {
            return;
        };
        while let Some(index) = self.name_checks.iter().position(|(name, _)| *name == current) {
            let (name, pending) = self.name_checks.remove(index);
            let answer = pending.wait().await;
            self.apply_name_answer(&name, answer);
        }
    }

    fn apply_name_answer(&mut self, name: &str, answer: Result<HostEvent, HostError>) {
        match answer {
            Ok(HostEvent::NameAvailableCheck(available)) => {
                self.engine.names_mut().resolve(name, available);
            }
            Ok(other) => {
                warn!(name, kind = ?other.kind(), "Unexpected answer to a name availability check");
                self.engine.names_mut().abandon(name);
            }
            Err(error) => {
                warn!(name, %error, "Name availability check went unanswered");
                self.engine.names_mut().abandon(name);
            }
        }
    }

    fn run_validation(&mut self, external: Option<Vec<ServerError>>) {
        let name = self.name().to_string();
        let canvas = Arc::clone(&self.canvas);
        if self.page == PageType::Instance {
            self.parameters.check_for_activation();
        }
        let candidate = match self.page {
            PageType::Topology => ValidationCandidate::topology(
                &name,
                &canvas,
                &self.registry,
                self.header.parameters.iter().map(|p| p.name.as_str()).collect(),
            )
            .with_name_check(self.config.check_name_availability && !self.edit_mode),
            PageType::Instance => {
                ValidationCandidate::instance(&name, &canvas, &self.registry, &self.parameters)
            }
        };
        self.engine.validate(&candidate, external);
    }

    /// Validates with whatever is known right now; pending name checks contribute nothing.
    pub fn check(&mut self) -> Result<Vec<ValidationError>, SessionError> {
        self.ensure_open()?;
        self.drain_name_checks();
        self.run_validation(None);
        Ok(self.engine.errors().to_vec())
    }

    /// Validates once the name check for the current name has been answered.
    pub async fn validate(&mut self) -> Result<Vec<ValidationError>, SessionError> {
        self.ensure_open()?;
        self.check_current_name();
        self.await_name_check().await;
        self.run_validation(None);
        Ok(self.engine.errors().to_vec())
    }

    // Saving

    /// Validates the topology and, when it is clean, sends it to the host and
    /// waits for the verdict.
    pub async fn save(&mut self) -> Result<SaveOutcome, SessionError> {
        self.ensure_page(PageType::Topology)?;
        if self.state == SessionState::Validating {
            return Err(SessionError::SaveInFlight);
        }
        self.transition(SessionState::Validating);

        self.check_current_name();
        self.await_name_check().await;
        self.run_validation(None);
        if self.engine.has_errors() {
            self.transition(SessionState::Dirty);
            return Ok(SaveOutcome::Refused(self.engine.errors().to_vec()));
        }

        let topology = self.topology();
        let answer = match self
            .bridge
            .request(HostMessage::SaveGraph(topology.clone()), &SAVE_RESPONSES)
        {
            Ok(pending) => pending.wait().await,
            Err(error) => Err(error),
        };
        match answer {
            Ok(HostEvent::SaveSucceeded) => {
                self.engine.clear();
                self.loaded.topology = Some(topology);
                self.transition(SessionState::Clean);
                Ok(SaveOutcome::Saved)
            }
            Ok(HostEvent::FailedOperationReason(errors)) => {
                self.run_validation(Some(errors));
                self.transition(SessionState::Dirty);
                Ok(SaveOutcome::Failed(self.engine.errors().to_vec()))
            }
            Ok(other) => {
                self.transition(SessionState::Dirty);
                Err(HostError::UnexpectedResponse {
                    expected: SAVE_RESPONSES.to_vec(),
                    found: other.kind(),
                }
                .into())
            }
            Err(error) => {
                self.transition(SessionState::Dirty);
                Err(error.into())
            }
        }
    }

    pub async fn save_instance(&mut self) -> Result<SaveOutcome, SessionError> {
        self.send_instance(false)
    }

    pub async fn save_and_activate(&mut self) -> Result<SaveOutcome, SessionError> {
        self.send_instance(true)
    }

    /// Instance saves are fire-and-forget: once sent, the session is clean.
    fn send_instance(&mut self, activate: bool) -> Result<SaveOutcome, SessionError> {
        self.ensure_page(PageType::Instance)?;
        if self.state == SessionState::Validating {
            return Err(SessionError::SaveInFlight);
        }
        self.run_validation(None);
        if self.engine.has_errors() {
            self.transition(SessionState::Dirty);
            return Ok(SaveOutcome::Refused(self.engine.errors().to_vec()));
        }
        let Some(instance) = self.instance() else {
            return Err(SessionError::WrongPage);
        };
        let message = if activate {
            HostMessage::SaveAndActivate(instance.clone())
        } else {
            HostMessage::SaveInstance(instance.clone())
        };
        self.bridge.send(message)?;
        self.loaded.instance = Some(instance);
        self.transition(SessionState::Clean);
        Ok(SaveOutcome::Saved)
    }

    /// Drops every unsaved edit, tells the host to dismiss the editor and closes.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.restore()?;
        self.engine.clear();
        // Late answers find their receivers gone and are dropped.
        self.name_checks.clear();
        if let Err(error) = self.bridge.send(HostMessage::CloseWindow) {
            debug!(%error, "Host already gone while closing");
        }
        self.transition(SessionState::Closed);
        Ok(())
    }
}
