// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::{
    write_lens_output, AbortReason, ControllerState, NetworkParams, NetworkSettings,
    StageDescriptor, StageMode, StageOutcome,
};
use crate::core::compiler::{CompiledGraph, GraphCompiler};
use crate::core::config::{CompilerConfig, Limits, RecordingOptions};
use crate::core::example_set::ExampleSet;
use crate::core::graph::{Unit, UnitRole};
use crate::core::payload::{PayloadBuilder, Region};
use crate::core::placement::{LoopbackPlacement, PlacementService, RecordedOutputs, RoutingTable};
use crate::core::topology::{
    GroupId, GroupParams, GroupRoles, InputFunction, LinkId, OutputFunction, Topology,
    UpdateFunction,
};
use crate::core::weights::read_lens_weights;
use crate::core::{PdpError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A multi-layer perceptron plus everything needed to run it: topology,
/// example set, weights file, recording options and the placed graph.
///
/// Stages run through [`train`](Self::train) and [`test`](Self::test).
/// Each stage first runs a preflight; a failed preflight returns
/// [`StageOutcome::Aborted`] and leaves the network untouched. The graph is
/// built on the first stage that passes preflight and reused afterwards
/// until the topology changes. Parameter changes in between only rewrite
/// the affected regions of the loaded units.
pub struct Network<P: PlacementService = LoopbackPlacement> {
    settings: NetworkSettings,
    topology: Topology,
    limits: Limits,
    recording: RecordingOptions,
    example_set: Option<ExampleSet>,
    weights_file: Option<PathBuf>,

    stage_id: u32,
    aborted: bool,
    weights_loaded: bool,
    /// Weights re-read after the graph was loaded; push before next run.
    weights_reloaded: bool,
    /// Learning parameters or criteria changed after the graph was loaded.
    cores_stale: bool,
    state: ControllerState,
    last_outputs: Option<RecordedOutputs>,

    compiled: Option<CompiledGraph>,
    routing: Option<RoutingTable>,
    service: P,
}

impl Network<LoopbackPlacement> {
    /// Network backed by the in-process loopback service.
    pub fn loopback(settings: NetworkSettings, config: &CompilerConfig) -> Result<Self> {
        Self::new(
            settings,
            config,
            LoopbackPlacement::new(config.limits.key_space_size),
        )
    }
}

impl<P: PlacementService> Network<P> {
    /// Create a network holding only the bias group.
    pub fn new(settings: NetworkSettings, config: &CompilerConfig, service: P) -> Result<Self> {
        config.limits.validate()?;
        if settings.ticks_per_interval == 0 {
            return Err(PdpError::Configuration(
                "ticks_per_interval must be at least 1".into(),
            ));
        }

        tracing::info!(
            "Creating {} network ({} intervals x {} ticks)",
            settings.net_type,
            settings.intervals,
            settings.ticks_per_interval
        );

        Ok(Self {
            settings,
            topology: Topology::new(config.limits.max_subgroup_units)?,
            limits: config.limits,
            recording: config.recording,
            example_set: None,
            weights_file: None,
            stage_id: 0,
            aborted: false,
            weights_loaded: false,
            weights_reloaded: false,
            cores_stale: false,
            state: ControllerState::Idle,
            last_outputs: None,
            compiled: None,
            routing: None,
            service,
        })
    }

    // =========================================================================
    // Topology building
    // =========================================================================

    pub fn add_group(
        &mut self,
        units: u32,
        roles: GroupRoles,
        input_funcs: Option<&[InputFunction]>,
        output_funcs: Option<&[OutputFunction]>,
        label: Option<&str>,
    ) -> Result<GroupId> {
        self.ensure_not_ended()?;
        let id = self
            .topology
            .add_group(units, roles, input_funcs, output_funcs, label)?;
        self.topology_changed();
        Ok(id)
    }

    pub fn add_link(&mut self, from: GroupId, to: GroupId, label: Option<&str>) -> Result<LinkId> {
        self.ensure_not_ended()?;
        let id = self.topology.add_link(from, to, label)?;
        self.topology_changed();
        Ok(id)
    }

    /// Per-group learning and convergence overrides.
    pub fn set_group_params(&mut self, group: GroupId, params: GroupParams) -> Result<()> {
        self.ensure_not_ended()?;
        let current = &mut self.topology.group_mut(group)?.params;
        if *current != params {
            *current = params;
            self.mark_cores_stale();
        }
        Ok(())
    }

    pub fn attach_example_set(&mut self, set: ExampleSet) -> &mut ExampleSet {
        self.drop_graph();
        self.example_set.insert(set)
    }

    /// Read a Lens examples file into the attached set, creating one named
    /// after the file if none is attached.
    pub fn set_examples_file(&mut self, path: &Path) -> Result<usize> {
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "examples".into());
        let count = self
            .example_set
            .get_or_insert_with(|| ExampleSet::new(&label))
            .read_lens_file(path)?;
        self.drop_graph();
        Ok(count)
    }

    /// Select the initial weights file. Weights are read on the next stage;
    /// with a graph already loaded only the Weights regions are rewritten.
    pub fn set_weights_file(&mut self, path: &Path) {
        self.weights_file = Some(path.to_path_buf());
        self.weights_loaded = false;
        if self.state.has_graph() {
            self.weights_reloaded = true;
        }
    }

    /// `num_updates` only sets the default epoch count of later training
    /// stages. The other parameters reach a loaded graph through its Core
    /// regions on the next stage.
    pub fn set_params(&mut self, params: &NetworkParams) {
        let before = self.settings;
        self.settings.apply(params);
        if self.settings.unit_params_differ(&before) {
            self.mark_cores_stale();
        }
    }

    /// Recording options only take effect before the first stage.
    pub fn set_recording_options(&mut self, options: RecordingOptions) {
        if self.stage_id > 0 {
            tracing::warn!(
                "Recording options ignored after stage {}, keeping {:?}",
                self.stage_id - 1,
                self.recording
            );
            return;
        }
        self.recording = options;
        self.drop_graph();
    }

    // =========================================================================
    // Stages
    // =========================================================================

    /// Run one training stage over the whole example set.
    pub fn train(
        &mut self,
        update_function: Option<UpdateFunction>,
        num_updates: Option<u32>,
    ) -> Result<StageOutcome> {
        let update_function = update_function.unwrap_or(self.settings.update_function);
        let epochs = num_updates.unwrap_or(self.settings.num_updates);
        self.run_stage(StageMode::Train, update_function, true, None, epochs)
    }

    /// Run one test stage of a single epoch.
    pub fn test(&mut self, num_examples: Option<u32>, reset_examples: bool) -> Result<StageOutcome> {
        let update_function = self.settings.update_function;
        self.run_stage(StageMode::Test, update_function, reset_examples, num_examples, 1)
    }

    /// Write the outputs recorded by the most recent stage as a Lens output
    /// file. Returns `false` without touching `path` when outputs are not
    /// recorded or the last stage aborted.
    pub fn write_lens_output_file(&self, path: &Path) -> Result<bool> {
        if !self.recording.rec_outputs {
            tracing::warn!("Lens output file not written: outputs not recorded");
            return Ok(false);
        }
        if self.aborted {
            tracing::warn!("Lens output file not written: last stage aborted");
            return Ok(false);
        }
        let Some(recorded) = self.last_outputs.as_ref() else {
            tracing::warn!("Lens output file not written: no stage recorded outputs");
            return Ok(false);
        };
        let examples = self
            .example_set
            .as_ref()
            .ok_or_else(|| PdpError::Example("no example set attached".into()))?;

        let mut out = BufWriter::new(File::create(path)?);
        write_lens_output(&mut out, &self.topology, examples, &self.settings, recorded)?;
        out.flush()?;

        tracing::info!(
            "Wrote {} recorded ticks to {}",
            recorded.ticks.len(),
            path.display()
        );
        Ok(true)
    }

    /// Stop the placement service. Every later stage aborts.
    pub fn end(&mut self) -> Result<()> {
        if self.state.is_ended() {
            return Ok(());
        }
        self.service.stop()?;
        self.state = ControllerState::Ended;
        tracing::info!("Network ended after {} stage(s)", self.stage_id);
        Ok(())
    }

    fn run_stage(
        &mut self,
        mode: StageMode,
        update_function: UpdateFunction,
        reset: bool,
        num_examples: Option<u32>,
        num_epochs: u32,
    ) -> Result<StageOutcome> {
        self.aborted = false;
        if self.state.is_ended() {
            return Ok(self.abort(AbortReason::Ended));
        }
        if let Some(reason) = self.preflight() {
            return Ok(self.abort(reason));
        }

        let available = self
            .example_set
            .as_ref()
            .map_or(0, |s| s.num_examples() as u32);
        let stage = StageDescriptor {
            stage_id: self.stage_id,
            mode,
            update_function,
            reset,
            num_examples: num_examples.unwrap_or(available),
            num_epochs,
        };

        tracing::info!(
            "Stage {} ({}): {} examples x {} epochs",
            stage.stage_id,
            mode,
            stage.num_examples,
            stage.num_epochs
        );

        if self.state.has_graph() {
            if self.weights_reloaded {
                self.push_weights()?;
            }
            if self.cores_stale {
                self.push_cores()?;
            }
            self.push_stage(&stage)?;
        } else {
            self.build_graph(&stage)?;
        }

        self.state = ControllerState::Running(stage.stage_id);
        let report = self.service.run(&stage);
        self.state = ControllerState::GraphBuilt;
        let report = report?;
        self.last_outputs = report.outputs.clone();

        if mode == StageMode::Test {
            if !self.recording.rec_test_results {
                tracing::warn!("Stage {}: test results not recorded", stage.stage_id);
            } else if let Some(results) = &report.test_results {
                tracing::info!("Stage {} test results: {}", stage.stage_id, results);
            }
        }

        self.stage_id += 1;
        Ok(StageOutcome::Completed(report))
    }

    /// Checks run before every stage, in order. Loads weights and compiles
    /// examples on the way.
    fn preflight(&mut self) -> Option<AbortReason> {
        if let Some(group) = self
            .topology
            .oversized_groups(self.limits.max_group_units)
            .first()
        {
            return Some(AbortReason::OversizedGroup {
                group: group.label.clone(),
                units: group.units,
                max: self.limits.max_group_units,
            });
        }

        let Some(path) = &self.weights_file else {
            return Some(AbortReason::NoWeightsFile);
        };
        if !self.weights_loaded {
            if let Err(e) = read_lens_weights(path, &mut self.topology) {
                return Some(AbortReason::WeightsFile(e.to_string()));
            }
            self.weights_loaded = true;
        }

        let Some(set) = self.example_set.as_mut() else {
            return Some(AbortReason::NoExampleSet);
        };
        if !set.examples_loaded() {
            return Some(AbortReason::ExamplesNotLoaded);
        }
        match set.compile(&mut self.topology) {
            Ok(0) => Some(AbortReason::NoExamples),
            Ok(_) => None,
            Err(e) => Some(AbortReason::ExampleCompile(e.to_string())),
        }
    }

    fn abort(&mut self, reason: AbortReason) -> StageOutcome {
        self.aborted = true;
        tracing::error!("Stage {} aborted: {}", self.stage_id, reason);
        StageOutcome::Aborted { reason }
    }

    fn build_graph(&mut self, stage: &StageDescriptor) -> Result<()> {
        self.state = ControllerState::Compiling;
        let built = self.compile_place_load(stage);
        match built {
            Ok((compiled, routing)) => {
                tracing::info!(
                    "Graph loaded: {} units, {} edges, checksum {}",
                    compiled.graph.unit_count(),
                    compiled.graph.edge_count(),
                    compiled.graph.checksum()
                );
                self.compiled = Some(compiled);
                self.routing = Some(routing);
                self.weights_reloaded = false;
                self.cores_stale = false;
                self.state = ControllerState::GraphBuilt;
                Ok(())
            }
            Err(e) => {
                self.state = ControllerState::Idle;
                Err(e)
            }
        }
    }

    fn compile_place_load(&mut self, stage: &StageDescriptor) -> Result<(CompiledGraph, RoutingTable)> {
        let compiled = GraphCompiler::new(self.limits).compile(&self.topology)?;
        let routing = self.service.place(&compiled.graph)?;

        let examples = self
            .example_set
            .as_ref()
            .and_then(ExampleSet::compiled)
            .ok_or_else(|| PdpError::Example("example set not compiled".into()))?;
        let payloads = PayloadBuilder {
            topology: &self.topology,
            compiled: &compiled,
            settings: &self.settings,
            recording: &self.recording,
            examples,
            routing: &routing,
        }
        .build_all(stage)?;

        self.service.load(&payloads)?;
        Ok((compiled, routing))
    }

    fn push_stage(&mut self, stage: &StageDescriptor) -> Result<()> {
        let compiled = self
            .compiled
            .as_ref()
            .ok_or_else(|| PdpError::Graph("no graph loaded".into()))?;
        let bytes = stage.to_bytes();
        for unit in compiled.graph.units() {
            self.service.update_region(&unit.id, Region::Stage, &bytes)?;
        }
        Ok(())
    }

    fn push_weights(&mut self) -> Result<()> {
        let pushed = self.push_regions(Region::Weights, &[UnitRole::Weight], |builder, unit| {
            builder.weights_region(unit)
        })?;
        self.weights_reloaded = false;
        tracing::debug!("Pushed reloaded weights to {} units", pushed);
        Ok(())
    }

    /// Rewrite the Core region of every unit that holds learning
    /// parameters or convergence criteria.
    fn push_cores(&mut self) -> Result<()> {
        let pushed = self.push_regions(
            Region::Core,
            &[UnitRole::Weight, UnitRole::Threshold],
            |builder, unit| builder.core_region(unit),
        )?;
        self.cores_stale = false;
        tracing::debug!("Pushed updated parameters to {} units", pushed);
        Ok(())
    }

    fn push_regions(
        &mut self,
        region: Region,
        roles: &[UnitRole],
        encode: impl Fn(&PayloadBuilder<'_>, &Unit) -> Result<Vec<u8>>,
    ) -> Result<usize> {
        let (Some(compiled), Some(routing)) = (self.compiled.as_ref(), self.routing.as_ref()) else {
            return Err(PdpError::Graph("no graph loaded".into()));
        };
        let examples = self
            .example_set
            .as_ref()
            .and_then(ExampleSet::compiled)
            .ok_or_else(|| PdpError::Example("example set not compiled".into()))?;
        let builder = PayloadBuilder {
            topology: &self.topology,
            compiled,
            settings: &self.settings,
            recording: &self.recording,
            examples,
            routing,
        };

        let mut pushed = 0;
        for unit in compiled.graph.units().filter(|u| roles.contains(&u.role)) {
            let block = encode(&builder, unit)?;
            self.service.update_region(&unit.id, region, &block)?;
            pushed += 1;
        }
        Ok(pushed)
    }

    fn ensure_not_ended(&self) -> Result<()> {
        if self.state.is_ended() {
            return Err(PdpError::Configuration("network has ended".into()));
        }
        Ok(())
    }

    fn topology_changed(&mut self) {
        self.weights_loaded = false;
        if let Some(set) = self.example_set.as_mut() {
            set.invalidate();
        }
        self.drop_graph();
    }

    fn mark_cores_stale(&mut self) {
        if self.state.has_graph() {
            self.cores_stale = true;
        }
    }

    fn drop_graph(&mut self) {
        if self.compiled.take().is_some() {
            tracing::debug!("Dropping built graph, rebuilt on next stage");
        }
        self.routing = None;
        self.weights_reloaded = false;
        self.cores_stale = false;
        self.last_outputs = None;
        if !self.state.is_ended() {
            self.state = ControllerState::Idle;
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn settings(&self) -> &NetworkSettings {
        &self.settings
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn recording(&self) -> &RecordingOptions {
        &self.recording
    }

    pub fn example_set(&self) -> Option<&ExampleSet> {
        self.example_set.as_ref()
    }

    pub fn weights_file(&self) -> Option<&Path> {
        self.weights_file.as_deref()
    }

    /// Id the next stage will run under.
    pub fn stage_id(&self) -> u32 {
        self.stage_id
    }

    /// Whether the most recent stage aborted in preflight.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn weights_loaded(&self) -> bool {
        self.weights_loaded
    }

    pub fn graph_ready(&self) -> bool {
        self.state.has_graph()
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn compiled_graph(&self) -> Option<&CompiledGraph> {
        self.compiled.as_ref()
    }

    pub fn routing(&self) -> Option<&RoutingTable> {
        self.routing.as_ref()
    }

    /// Outputs recorded by the most recent completed stage.
    pub fn last_outputs(&self) -> Option<&RecordedOutputs> {
        self.last_outputs.as_ref()
    }

    pub fn service(&self) -> &P {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut P {
        &mut self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::example_set::{Event, Example, ValueList};
    use crate::core::placement::TestResults;
    use crate::core::topology::GroupRole;
    use crate::core::weights::LENS_WEIGHT_MAGIC_COOKIE;

    fn weights_text(count: usize) -> String {
        let mut out = format!("{}\n{}\n1\n0\n", LENS_WEIGHT_MAGIC_COOKIE, count);
        for n in 0..count {
            out.push_str(&format!("{}\n", n as f64 * 0.1));
        }
        out
    }

    fn example_set() -> ExampleSet {
        let mut set = ExampleSet::new("pairs");
        for (a, b) in [(0.0, 1.0), (1.0, 0.0)] {
            set.add_example(
                Example::new(None).with_event(
                    Event::new()
                        .with_input(ValueList::dense(None, vec![Some(a), Some(b)]))
                        .with_target(ValueList::dense(None, vec![Some(b), Some(a)])),
                ),
            );
        }
        set
    }

    /// in(2) -> out(2) with weights on disk and two examples attached.
    fn ready() -> (Network, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.wts");
        // bias->out 2, in->out 4
        std::fs::write(&path, weights_text(6)).unwrap();

        let mut net = Network::loopback(NetworkSettings::default(), &CompilerConfig::default()).unwrap();
        let i = net
            .add_group(2, GroupRole::Input.into(), None, None, Some("in"))
            .unwrap();
        let o = net
            .add_group(2, GroupRole::Output.into(), None, None, Some("out"))
            .unwrap();
        net.add_link(i, o, None).unwrap();
        net.set_weights_file(&path);
        net.attach_example_set(example_set());
        (net, dir)
    }

    #[test]
    fn test_preflight_order() {
        let mut net = Network::loopback(NetworkSettings::default(), &CompilerConfig::default()).unwrap();
        net.add_group(200, GroupRole::Hidden.into(), None, None, Some("big"))
            .unwrap();
        let outcome = net.test(None, true).unwrap();
        assert!(matches!(
            outcome.abort_reason(),
            Some(AbortReason::OversizedGroup { units: 200, max: 128, .. })
        ));
        assert!(net.is_aborted());
        assert_eq!(net.stage_id(), 0);

        let mut net = Network::loopback(NetworkSettings::default(), &CompilerConfig::default()).unwrap();
        assert_eq!(
            net.train(None, None).unwrap().abort_reason(),
            Some(&AbortReason::NoWeightsFile)
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wts");
        std::fs::write(&path, weights_text(0)).unwrap();
        net.set_weights_file(&path);
        assert_eq!(
            net.train(None, None).unwrap().abort_reason(),
            Some(&AbortReason::NoExampleSet)
        );
        assert!(net.weights_loaded());

        net.attach_example_set(ExampleSet::new("empty"));
        assert_eq!(
            net.train(None, None).unwrap().abort_reason(),
            Some(&AbortReason::ExamplesNotLoaded)
        );
        assert_eq!(net.state(), ControllerState::Idle);
    }

    #[test]
    fn test_weights_mismatch_aborts() {
        let (mut net, dir) = ready();
        let path = dir.path().join("short.wts");
        std::fs::write(&path, weights_text(5)).unwrap();
        net.set_weights_file(&path);

        let outcome = net.train(None, None).unwrap();
        assert!(matches!(outcome.abort_reason(), Some(AbortReason::WeightsFile(_))));
        assert!(!net.weights_loaded());
    }

    #[test]
    fn test_stages_reuse_graph() {
        let (mut net, _dir) = ready();

        let first = net.train(Some(UpdateFunction::Steepest), Some(5)).unwrap();
        assert!(first.is_completed());
        assert_eq!(net.stage_id(), 1);
        assert_eq!(net.state(), ControllerState::GraphBuilt);
        let checksum = net.compiled_graph().unwrap().graph.checksum();
        let units = net.compiled_graph().unwrap().graph.unit_count();
        assert_eq!(net.service().payload_count(), units);
        assert!(net.service().updates().is_empty());

        let second = net.test(None, true).unwrap();
        let report = second.report().unwrap();
        assert_eq!(report.stage_id, 1);
        assert_eq!(report.test_results.unwrap().epochs_trained, 5);
        assert_eq!(net.compiled_graph().unwrap().graph.checksum(), checksum);
        assert_eq!(net.service().updates().len(), units);
        assert!(net
            .service()
            .updates()
            .iter()
            .all(|u| u.region == Region::Stage));

        let runs = net.service().runs();
        assert_eq!(runs[0].num_epochs, 5);
        assert_eq!(runs[0].update_function, UpdateFunction::Steepest);
        assert_eq!(runs[1].num_examples, 2);
        assert_eq!(runs[1].num_epochs, 1);
    }

    #[test]
    fn test_weight_reload_pushes_weights_only() {
        let (mut net, dir) = ready();
        net.train(None, None).unwrap();

        let path = dir.path().join("next.wts");
        std::fs::write(&path, weights_text(6)).unwrap();
        net.set_weights_file(&path);
        assert!(net.graph_ready());

        net.service_mut().push_test_results(TestResults {
            epochs_trained: 1,
            examples_tested: 2,
            ticks_tested: 4,
            examples_correct: 2,
        });
        let outcome = net.test(Some(1), false).unwrap();
        assert_eq!(outcome.report().unwrap().test_results.unwrap().examples_correct, 2);

        let weight_units = net
            .compiled_graph()
            .unwrap()
            .graph
            .units_with_role(UnitRole::Weight)
            .count();
        let updates = net.service().updates();
        let weights = updates.iter().filter(|u| u.region == Region::Weights).count();
        assert_eq!(weights, weight_units);
        assert!(updates
            .iter()
            .all(|u| matches!(u.region, Region::Weights | Region::Stage)));
    }

    #[test]
    fn test_topology_change_drops_graph() {
        let (mut net, _dir) = ready();
        net.train(None, None).unwrap();
        assert!(net.graph_ready());

        net.add_group(3, GroupRole::Hidden.into(), None, None, Some("h"))
            .unwrap();
        assert!(!net.graph_ready());
        assert!(!net.weights_loaded());
        assert!(!net.example_set().unwrap().is_compiled());

        // old file no longer matches: bias->h 3 more links
        let outcome = net.train(None, None).unwrap();
        assert!(matches!(outcome.abort_reason(), Some(AbortReason::WeightsFile(_))));
        assert_eq!(net.stage_id(), 1);
    }

    #[test]
    fn test_recording_options_frozen_after_first_stage() {
        let (mut net, _dir) = ready();
        let quiet = RecordingOptions {
            rec_test_results: false,
            ..Default::default()
        };
        net.set_recording_options(quiet);
        assert!(!net.recording().rec_test_results);

        net.train(None, None).unwrap();
        net.set_recording_options(RecordingOptions::default());
        assert!(!net.recording().rec_test_results);
    }

    #[test]
    fn test_end_aborts_later_stages() {
        let (mut net, _dir) = ready();
        net.train(None, None).unwrap();
        net.end().unwrap();
        assert!(net.service().is_stopped());
        assert_eq!(
            net.test(None, true).unwrap().abort_reason(),
            Some(&AbortReason::Ended)
        );
        assert!(net.add_group(1, GroupRole::Hidden.into(), None, None, None).is_err());
        assert_eq!(net.stage_id(), 1);
    }
}
