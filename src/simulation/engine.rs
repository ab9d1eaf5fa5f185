use tracing::{debug, info, span, warn, Level};

use crate::dispatch::dispatcher::{DispatchOutcome, Dispatcher};
use crate::dispatch::route_log::RouteLog;
use crate::domain::bin::BinRegistry;
use crate::domain::types::{BinId, BinStatus, NodeId, Truck, TruckState};
use crate::error::{DispatchError, Result};
use crate::fixtures::data_generator::FillSource;
use crate::priority::queue::BinQueue;
use crate::routing::graph::RoadNetwork;
use crate::routing::shortest_path::Route;

/// What the driver reports back after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverAction {
    BinPicked(BinId),
    TruckFull,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub urgent: Vec<BinId>,
    pub collected: Vec<BinId>,
    pub depot_returns: usize,
    pub distance: u64,
    /// Urgent bins skipped this step because no road leads to them.
    pub blocked: Vec<BinId>,
}

/// One truck serving a set of bins on a fixed road network.
///
/// Each step fills every bin from the fill source, then lets the truck make
/// up to `dispatches_per_step` moves. The driver is scripted to empty each
/// bin right after the truck arrives.
pub struct Simulation<F: FillSource> {
    network: RoadNetwork,
    bins: BinRegistry,
    queue: BinQueue,
    truck: Truck,
    dispatcher: Dispatcher,
    fill: F,
    log: RouteLog,
    dispatches_per_step: usize,
    steps_run: usize,
}

impl<F: FillSource> Simulation<F> {
    pub fn new(
        network: RoadNetwork,
        bins: BinRegistry,
        truck: Truck,
        depot: NodeId,
        fill: F,
        dispatches_per_step: usize,
    ) -> Result<Self> {
        let dispatcher = Dispatcher::new(&network, depot)?;
        network.check_node(truck.current_node)?;
        for bin in bins.iter() {
            network.check_node(bin.node())?;
        }

        let mut queue = BinQueue::new();
        for bin in bins.iter() {
            if bin.status() == BinStatus::Urgent {
                queue.insert(bin)?;
            }
        }

        Ok(Simulation {
            network,
            bins,
            queue,
            truck,
            dispatcher,
            fill,
            log: RouteLog::new(),
            dispatches_per_step,
            steps_run: 0,
        })
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn bins(&self) -> &BinRegistry {
        &self.bins
    }

    pub fn queue(&self) -> &BinQueue {
        &self.queue
    }

    pub fn truck(&self) -> &Truck {
        &self.truck
    }

    pub fn route_log(&self) -> &RouteLog {
        &self.log
    }

    pub fn steps_run(&self) -> usize {
        self.steps_run
    }

    /// Apply one round of fill increments. Returns the bins that are urgent
    /// after the round.
    pub fn fill_bins(&mut self) -> Result<Vec<BinId>> {
        let mut urgent = Vec::new();
        for bin in self.bins.iter_mut() {
            let delta = self.fill.next_increment(bin.id());
            let status = bin.apply_fill_increment(delta, &mut self.queue)?;
            debug!("Bin {} +{} -> {}/{} ({})", bin.id(), delta, bin.fill(), bin.capacity(), status);
            if status == BinStatus::Urgent {
                urgent.push(bin.id());
            }
        }
        Ok(urgent)
    }

    /// Let the truck make its next move and log the route taken.
    pub fn dispatch(&mut self) -> Result<DispatchOutcome> {
        let outcome = self.dispatcher.dispatch_next(
            &mut self.truck,
            &self.network,
            &mut self.queue,
            &mut self.bins,
        )?;
        match &outcome {
            DispatchOutcome::Arrived { route, .. } | DispatchOutcome::ReturnedToDepot { route } => {
                self.log.record(self.truck.id, route)
            }
            DispatchOutcome::Idle => {}
        }
        Ok(outcome)
    }

    /// Returns the depot route when the action sent the truck home.
    pub fn handle_driver_action(&mut self, action: DriverAction) -> Result<Option<Route>> {
        match action {
            DriverAction::BinPicked(bin) => {
                self.bins.collect(bin, &mut self.queue)?;
                Ok(None)
            }
            DriverAction::TruckFull => {
                let route = self.dispatcher.return_to_depot(&mut self.truck, &self.network)?;
                self.log.record(self.truck.id, &route);
                Ok(Some(route))
            }
        }
    }

    /// A citizen reports `bin` overflowing. It becomes urgent right away.
    pub fn report_overflow(&mut self, bin: BinId) -> Result<BinStatus> {
        self.bins.report_overflow(bin, &mut self.queue)
    }

    pub fn step(&mut self) -> Result<StepReport> {
        self.steps_run += 1;
        let step_span = span!(Level::DEBUG, "step", step = self.steps_run);
        let _guard = step_span.enter();

        let mut report = StepReport {
            urgent: self.fill_bins()?,
            ..StepReport::default()
        };

        // Unreachable bins sit out the rest of the step.
        let mut held = Vec::new();
        let mut moves = 0;
        while moves < self.dispatches_per_step {
            let heading_home = self.truck.state == TruckState::Full || self.truck.is_full();
            let next = self.queue.peek().map(|entry| entry.bin);

            match self.dispatch() {
                Ok(DispatchOutcome::Idle) => break,
                Ok(DispatchOutcome::Arrived { bin, route }) => {
                    moves += 1;
                    report.distance += route.distance;
                    self.handle_driver_action(DriverAction::BinPicked(bin))?;
                    report.collected.push(bin);
                }
                Ok(DispatchOutcome::ReturnedToDepot { route }) => {
                    moves += 1;
                    report.distance += route.distance;
                    report.depot_returns += 1;
                }
                Err(e @ DispatchError::NoPath { .. }) => match next {
                    Some(bin) if !heading_home => {
                        warn!("Skipping bin {} this step: {}", bin, e);
                        self.queue.remove(bin);
                        held.push(bin);
                        report.blocked.push(bin);
                    }
                    _ => {
                        warn!("Truck {} is stranded: {}", self.truck.id, e);
                        break;
                    }
                },
                Err(e) => {
                    self.requeue(&held)?;
                    return Err(e);
                }
            }
        }
        self.requeue(&held)?;

        info!(
            "Step {}: {} urgent, {} collected, truck at node {} with load {}/{}",
            self.steps_run,
            report.urgent.len(),
            report.collected.len(),
            self.truck.current_node,
            self.truck.load,
            self.truck.capacity
        );
        Ok(report)
    }

    fn requeue(&mut self, held: &[BinId]) -> Result<()> {
        for &bin in held {
            self.queue.insert(self.bins.get(bin)?)?;
        }
        Ok(())
    }

    /// Send the truck home if it is out, and hand back the finished log.
    pub fn finish(&mut self) -> Result<&RouteLog> {
        if let Some(route) = self.dispatcher.finish(&mut self.truck, &self.network)? {
            self.log.record(self.truck.id, &route);
        }
        info!(
            "Simulation finished after {} steps, total distance {}",
            self.steps_run, self.truck.total_distance
        );
        Ok(&self.log)
    }
}
