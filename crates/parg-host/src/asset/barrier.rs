use std::collections::HashMap;

use crate::engine::Engine;
use crate::error::HostError;

use super::{AssetId, AssetKind, AssetRequest, AssetStatus};

/// What to do when the last asset completes and some assets failed.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FailurePolicy {
    /// Start anyway; the engine runs without the missing assets.
    #[default]
    Proceed,
    /// Do not start.
    Abort,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BarrierState {
    /// Accepting declarations.
    Declaring,
    /// Sealed; waiting for outstanding completions.
    Loading,
    Ready,
    Aborted,
}

/// The one-time edge produced when the pending count reaches zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Ready { failed: Vec<AssetId> },
    Aborted { failed: Vec<AssetId> },
}

/// Terminal outcome of one fetch, delivered back to the barrier's thread.
#[derive(Debug)]
pub struct AssetCompletion {
    pub id: AssetId,
    pub result: Result<Vec<u8>, HostError>,
}

/// Completion-counting barrier gating the Loading → Ready transition.
///
/// Not thread-safe by design of its callers: every completion is funnelled to
/// the thread that owns the barrier and the engine, so decrement-then-check is
/// never interleaved.
#[derive(Debug)]
pub struct AssetBarrier {
    requests: Vec<AssetRequest>,
    index: HashMap<AssetId, usize>,
    pending: usize,
    state: BarrierState,
    policy: FailurePolicy,
}

impl AssetBarrier {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            requests: Vec::new(),
            index: HashMap::new(),
            pending: 0,
            state: BarrierState::Declaring,
            policy,
        }
    }

    /// Registers one pending asset. Must happen before `seal`.
    pub fn declare(&mut self, id: impl Into<AssetId>, kind: AssetKind) -> Result<(), HostError> {
        let id = id.into();
        if self.state != BarrierState::Declaring {
            return Err(HostError::BarrierSealed(id));
        }
        if self.index.contains_key(&id) {
            return Err(HostError::DuplicateAsset(id));
        }

        self.index.insert(id.clone(), self.requests.len());
        self.requests.push(AssetRequest::new(id, kind));
        self.pending += 1;
        Ok(())
    }

    /// Ends the declaration phase.
    ///
    /// With nothing declared (or everything already completed) the transition
    /// is returned right away.
    pub fn seal(&mut self) -> Option<Transition> {
        if self.state != BarrierState::Declaring {
            return None;
        }
        self.state = BarrierState::Loading;
        self.finish_if_drained()
    }

    /// Records a terminal outcome and transfers successful payloads into `engine`.
    ///
    /// Returns the transition when this completion drained the barrier.
    pub fn complete(
        &mut self,
        completion: AssetCompletion,
        engine: &mut dyn Engine,
    ) -> Result<Option<Transition>, HostError> {
        let AssetCompletion { id, result } = completion;

        let Some(&slot) = self.index.get(&id) else {
            log::error!("completion for undeclared asset {id}");
            return Err(HostError::UnexpectedCompletion(id));
        };
        if self.requests[slot].status.is_terminal() {
            log::error!("duplicate completion for asset {id}");
            return Err(HostError::UnexpectedCompletion(id));
        }

        self.requests[slot].status = match result {
            // the fetcher already logged the failure with its location
            Err(e) => {
                log::debug!("asset {id} failed: {e}");
                AssetStatus::Failed
            }
            Ok(payload) => match transfer(engine, &id, &payload) {
                Ok(()) => AssetStatus::Succeeded,
                Err(e) => {
                    log::error!("{e}");
                    AssetStatus::Failed
                }
            },
        };

        debug_assert!(self.pending > 0);
        self.pending -= 1;
        log::debug!("asset {id} done, {} pending", self.pending);

        Ok(self.finish_if_drained())
    }

    fn finish_if_drained(&mut self) -> Option<Transition> {
        if self.state != BarrierState::Loading || self.pending > 0 {
            return None;
        }

        let failed = self.failed();
        if !failed.is_empty() && self.policy == FailurePolicy::Abort {
            self.state = BarrierState::Aborted;
            return Some(Transition::Aborted { failed });
        }

        self.state = BarrierState::Ready;
        Some(Transition::Ready { failed })
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn state(&self) -> BarrierState {
        self.state
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Declared requests in declaration order.
    pub fn requests(&self) -> &[AssetRequest] {
        &self.requests
    }

    pub fn failed(&self) -> Vec<AssetId> {
        self.requests
            .iter()
            .filter(|r| r.status == AssetStatus::Failed)
            .map(|r| r.id.clone())
            .collect()
    }
}

/// Moves `payload` into engine memory: alloc, copy, commit.
///
/// If the allocated range does not fit the engine's memory nothing is copied
/// and `commit` is not called.
pub fn transfer(engine: &mut dyn Engine, id: &AssetId, payload: &[u8]) -> Result<(), HostError> {
    let len = payload.len();
    let offset = engine.alloc(id, len);
    log::debug!("allocated {len} bytes for {id} at {offset}");

    let memory = engine.memory_mut();
    let capacity = memory.len();
    let Some(dst) = offset
        .checked_add(len)
        .and_then(|end| memory.get_mut(offset..end))
    else {
        return Err(HostError::Allocation {
            id: id.clone(),
            offset,
            len,
            capacity,
        });
    };
    dst.copy_from_slice(payload);

    engine.commit(id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{capture_logs, Call, RecordingEngine};

    fn ok(id: &str, bytes: &[u8]) -> AssetCompletion {
        AssetCompletion {
            id: AssetId::from(id),
            result: Ok(bytes.to_vec()),
        }
    }

    fn failed(id: &str) -> AssetCompletion {
        AssetCompletion {
            id: AssetId::from(id),
            result: Err(HostError::Transport {
                url: format!("parg/{id}"),
                reason: "connection refused".into(),
            }),
        }
    }

    fn barrier_with(ids: &[&str], policy: FailurePolicy) -> AssetBarrier {
        let mut barrier = AssetBarrier::new(policy);
        for id in ids {
            barrier.declare(*id, AssetKind::Binary).unwrap();
        }
        assert_eq!(barrier.seal(), None);
        barrier
    }

    // ── declaration ───────────────────────────────────────────────────────

    #[test]
    fn zero_assets_ready_on_seal() {
        let mut barrier = AssetBarrier::new(FailurePolicy::Proceed);
        assert_eq!(barrier.seal(), Some(Transition::Ready { failed: vec![] }));
        assert_eq!(barrier.state(), BarrierState::Ready);
        // A second seal is not a second edge.
        assert_eq!(barrier.seal(), None);
    }

    #[test]
    fn duplicate_declaration_rejected() {
        let mut barrier = AssetBarrier::new(FailurePolicy::Proceed);
        barrier.declare("a.bin", AssetKind::Binary).unwrap();
        let err = barrier.declare("a.bin", AssetKind::Image).unwrap_err();
        assert!(matches!(err, HostError::DuplicateAsset(_)));
        assert_eq!(barrier.pending(), 1);
    }

    #[test]
    fn declaration_after_seal_rejected() {
        let mut barrier = barrier_with(&["a.bin"], FailurePolicy::Proceed);
        let err = barrier.declare("b.bin", AssetKind::Binary).unwrap_err();
        assert!(matches!(err, HostError::BarrierSealed(_)));
    }

    // ── counting ──────────────────────────────────────────────────────────

    #[test]
    fn either_order_drains_to_zero_once() {
        for order in [["a.bin", "b.bin"], ["b.bin", "a.bin"]] {
            let mut engine = RecordingEngine::new("primary");
            let mut barrier = barrier_with(&["a.bin", "b.bin"], FailurePolicy::Proceed);

            let first = barrier.complete(ok(order[0], &[1]), &mut engine).unwrap();
            assert_eq!(first, None);
            assert_eq!(barrier.pending(), 1);

            let second = barrier.complete(ok(order[1], &[2]), &mut engine).unwrap();
            assert_eq!(second, Some(Transition::Ready { failed: vec![] }));
            assert_eq!(barrier.pending(), 0);
        }
    }

    #[test]
    fn every_interleaving_fires_exactly_once() {
        let ids = ["a", "b", "c"];
        let orders = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        for order in orders {
            for failing in 0..=ids.len() {
                let mut engine = RecordingEngine::new("primary");
                let mut barrier = barrier_with(&ids, FailurePolicy::Proceed);
                let mut edges = 0;

                for (step, &i) in order.iter().enumerate() {
                    let completion = if step < failing { failed(ids[i]) } else { ok(ids[i], b"xy") };
                    if barrier.complete(completion, &mut engine).unwrap().is_some() {
                        edges += 1;
                        assert_eq!(step, ids.len() - 1, "edge fired before the last completion");
                    }
                }

                assert_eq!(edges, 1);
                assert_eq!(barrier.state(), BarrierState::Ready);
            }
        }
    }

    #[test]
    fn completion_before_seal_waits_for_seal() {
        let mut engine = RecordingEngine::new("primary");
        let mut barrier = AssetBarrier::new(FailurePolicy::Proceed);
        barrier.declare("a.bin", AssetKind::Binary).unwrap();

        assert_eq!(barrier.complete(ok("a.bin", &[1]), &mut engine).unwrap(), None);
        assert_eq!(barrier.seal(), Some(Transition::Ready { failed: vec![] }));
    }

    #[test]
    fn duplicate_completion_leaves_count_alone() {
        let mut engine = RecordingEngine::new("primary");
        let mut barrier = barrier_with(&["a.bin", "b.bin"], FailurePolicy::Proceed);

        barrier.complete(ok("a.bin", &[1]), &mut engine).unwrap();
        let err = barrier.complete(ok("a.bin", &[1]), &mut engine).unwrap_err();

        assert!(matches!(err, HostError::UnexpectedCompletion(_)));
        assert_eq!(barrier.pending(), 1);
        assert_eq!(engine.commits(), 1);
    }

    #[test]
    fn unknown_completion_rejected() {
        let mut engine = RecordingEngine::new("primary");
        let mut barrier = barrier_with(&["a.bin"], FailurePolicy::Proceed);

        let err = barrier.complete(ok("other.bin", &[1]), &mut engine).unwrap_err();
        assert!(matches!(err, HostError::UnexpectedCompletion(_)));
        assert_eq!(barrier.pending(), 1);
    }

    // ── failure policy ────────────────────────────────────────────────────

    #[test]
    fn proceed_reports_failures() {
        let mut engine = RecordingEngine::new("primary");
        let mut barrier = barrier_with(&["a.bin", "b.bin"], FailurePolicy::Proceed);

        barrier.complete(failed("a.bin"), &mut engine).unwrap();
        let edge = barrier.complete(ok("b.bin", &[9]), &mut engine).unwrap();

        assert_eq!(edge, Some(Transition::Ready { failed: vec![AssetId::from("a.bin")] }));
    }

    #[test]
    fn abort_blocks_ready() {
        let mut engine = RecordingEngine::new("primary");
        let mut barrier = barrier_with(&["a.bin", "b.bin"], FailurePolicy::Abort);

        barrier.complete(ok("a.bin", &[9]), &mut engine).unwrap();
        let edge = barrier.complete(failed("b.bin"), &mut engine).unwrap();

        assert_eq!(edge, Some(Transition::Aborted { failed: vec![AssetId::from("b.bin")] }));
        assert_eq!(barrier.state(), BarrierState::Aborted);
    }

    #[test]
    fn abort_without_failures_is_ready() {
        let mut engine = RecordingEngine::new("primary");
        let mut barrier = barrier_with(&["a.bin"], FailurePolicy::Abort);

        let edge = barrier.complete(ok("a.bin", &[9]), &mut engine).unwrap();
        assert_eq!(edge, Some(Transition::Ready { failed: vec![] }));
    }

    // ── transfer ──────────────────────────────────────────────────────────

    #[test]
    fn transfer_is_alloc_copy_commit() {
        let mut engine = RecordingEngine::new("primary");
        let mut barrier = barrier_with(&["a.bin"], FailurePolicy::Proceed);

        barrier.complete(ok("a.bin", &[4, 5, 6]), &mut engine).unwrap();

        let calls = engine.calls();
        assert_eq!(
            calls,
            vec![
                Call::Alloc { id: "a.bin".into(), len: 3 },
                Call::Commit { id: "a.bin".into(), bytes: vec![4, 5, 6] },
            ]
        );
    }

    #[test]
    fn failure_never_touches_engine() {
        let mut engine = RecordingEngine::new("primary");
        let mut barrier = barrier_with(&["a.bin"], FailurePolicy::Proceed);

        barrier.complete(failed("a.bin"), &mut engine).unwrap();
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn out_of_bounds_allocation_never_commits() {
        let mut engine = RecordingEngine::with_capacity("primary", 4);
        let mut barrier = barrier_with(&["big.bin"], FailurePolicy::Proceed);

        let edge = barrier.complete(ok("big.bin", &[0; 8]), &mut engine).unwrap();

        assert_eq!(engine.commits(), 0);
        assert_eq!(edge, Some(Transition::Ready { failed: vec![AssetId::from("big.bin")] }));
    }

    // ── logging ───────────────────────────────────────────────────────────

    #[test]
    fn fetch_failures_are_not_logged_twice() {
        let mut engine = RecordingEngine::new("primary");
        let mut barrier = barrier_with(&["a.bin"], FailurePolicy::Proceed);

        let (_, records) = capture_logs(|| barrier.complete(failed("a.bin"), &mut engine));

        assert!(records.iter().all(|(level, _)| *level > log::Level::Warn));
        assert!(records.iter().any(|(_, msg)| msg.contains("a.bin")));
    }

    #[test]
    fn allocation_failures_are_reported_once() {
        let mut engine = RecordingEngine::with_capacity("primary", 4);
        let mut barrier = barrier_with(&["big.bin"], FailurePolicy::Proceed);

        let (_, records) = capture_logs(|| barrier.complete(ok("big.bin", &[0; 8]), &mut engine));

        let loud: Vec<_> = records
            .iter()
            .filter(|(level, _)| *level <= log::Level::Warn)
            .collect();
        assert_eq!(loud.len(), 1);
        assert!(loud[0].1.contains("big.bin"));
    }
}
