// Tests for SimulationContext press handling and pulse accounting
#[cfg(test)]
mod tests {
    use crate::core::components::{FlipFlopState, SinkCounts};
    use crate::core::errors::SimError;
    use crate::core::execution::config::SimulationConfig;
    use crate::core::execution::simulation_context::{
        run_presses, PulseCounts, PulseObserver, SimulationContext,
    };
    use crate::core::graph::ModuleGraph;
    use crate::core::tests::{SCENARIO_A, SCENARIO_B};
    use crate::core::types::{ModuleId, Pulse, PulseLevel};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every delivered pulse
    #[derive(Default)]
    struct Recorder {
        pulses: Vec<(u64, Pulse)>,
        completed: Vec<(u64, u64)>,
    }

    impl PulseObserver for Recorder {
        fn on_pulse(&mut self, press: u64, pulse: &Pulse) {
            self.pulses.push((press, pulse.clone()));
        }

        fn on_press_complete(&mut self, press: u64, delivered: u64) {
            self.completed.push((press, delivered));
        }
    }

    /// Shares its tally with the test through an Rc
    struct SharedTally(Rc<RefCell<u64>>);

    impl PulseObserver for SharedTally {
        fn on_pulse(&mut self, _press: u64, _pulse: &Pulse) {
            *self.0.borrow_mut() += 1;
        }
    }

    fn random_circuit(seed: u64) -> String {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = rng.gen_range(3..12);
        let names: Vec<String> = (0..count).map(|i| format!("m{}", i)).collect();

        // broadcaster feeds everything so every conjunction has a feeder.
        // Edges only point forward: a loop of conjunctions never settles.
        let mut lines = vec![format!("broadcaster -> {}", names.join(", "))];
        for (index, name) in names.iter().enumerate() {
            let prefix = if rng.gen_bool(0.5) { "%" } else { "&" };
            let fanout = rng.gen_range(1..4);
            let outputs: Vec<String> = (0..fanout)
                .map(|_| {
                    if index + 1 == names.len() || rng.gen_bool(0.1) {
                        "out".to_string()
                    } else {
                        names[rng.gen_range(index + 1..names.len())].clone()
                    }
                })
                .collect();
            lines.push(format!("{}{} -> {}", prefix, name, outputs.join(", ")));
        }
        lines.join("\n")
    }

    #[test]
    fn test_scenario_a_single_press() {
        let mut ctx = SimulationContext::new(ModuleGraph::parse(SCENARIO_A).unwrap());
        let delivered = ctx.press().unwrap();
        assert_eq!(delivered, 12);
        assert_eq!(ctx.counts(), PulseCounts { low: 8, high: 4 });
        // a, b, c each toggled on then off again within the press
        for name in ["a", "b", "c"] {
            assert_eq!(
                ctx.graph().module(name).unwrap().flip_flop_state(),
                Some(FlipFlopState::Off)
            );
        }
    }

    #[test]
    fn test_scenario_a_thousand_presses() {
        let counts = run_presses(ModuleGraph::parse(SCENARIO_A).unwrap(), 1000).unwrap();
        assert_eq!(counts, PulseCounts { low: 8000, high: 4000 });
        assert_eq!(counts.product(), Some(32_000_000));
    }

    #[test]
    fn test_scenario_b_first_press_order() {
        let mut ctx = SimulationContext::new(ModuleGraph::parse(SCENARIO_B).unwrap());
        let mut recorder = Recorder::default();
        ctx.press_with(&mut recorder).unwrap();

        let trace: Vec<String> = recorder.pulses.iter().map(|(_, p)| p.to_string()).collect();
        assert_eq!(
            trace,
            vec![
                "button -low-> broadcaster",
                "broadcaster -low-> a",
                "a -high-> inv",
                "a -high-> con",
                "inv -low-> b",
                "con -high-> output",
                "b -high-> con",
                "con -low-> output",
            ]
        );
        assert_eq!(recorder.completed, vec![(1, 8)]);
        assert_eq!(
            ctx.graph().module("output").unwrap().sink_counts(),
            Some(SinkCounts { high: 1, low: 1 })
        );
    }

    #[test]
    fn test_scenario_b_thousand_presses() {
        let mut ctx = SimulationContext::new(ModuleGraph::parse(SCENARIO_B).unwrap());
        let counts = ctx.run_configured_presses().unwrap();
        assert_eq!(ctx.press_count(), 1000);
        assert_eq!(counts.product(), Some(11_687_500));
    }

    #[test]
    fn test_runs_do_not_share_state() {
        let graph = ModuleGraph::parse(SCENARIO_B).unwrap();
        let first = run_presses(graph.clone(), 1000).unwrap();
        let second = run_presses(graph, 1000).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_determinism_on_random_circuits() {
        for seed in 0..20 {
            let text = random_circuit(seed);
            let graph = ModuleGraph::parse(&text).unwrap();

            let mut left = SimulationContext::new(graph.clone());
            let mut right = SimulationContext::new(graph);
            let mut left_trace = Recorder::default();
            let mut right_trace = Recorder::default();
            for _ in 0..25 {
                left.press_with(&mut left_trace).unwrap();
                right.press_with(&mut right_trace).unwrap();
            }
            assert_eq!(left.counts(), right.counts(), "seed {}", seed);
            assert_eq!(left_trace.pulses, right_trace.pulses, "seed {}", seed);
        }
    }

    #[test]
    fn test_counter_conservation() {
        for seed in 100..120 {
            let graph = ModuleGraph::parse(&random_circuit(seed)).unwrap();
            let tally = Rc::new(RefCell::new(0u64));
            let mut ctx = SimulationContext::new(graph);
            ctx.add_observer(Box::new(SharedTally(Rc::clone(&tally))));

            let mut delivered = 0;
            for _ in 0..25 {
                delivered += ctx.press().unwrap();
            }
            let counts = ctx.counts();
            assert_eq!(counts.total(), Some(delivered), "seed {}", seed);
            assert_eq!(counts.total(), Some(*tally.borrow()), "seed {}", seed);
            // at least the button and broadcaster pulses
            assert!(counts.low >= 50, "seed {}", seed);
        }
    }

    #[test]
    fn test_counts_overflow_is_reported() {
        let counts = PulseCounts {
            low: 1 << 33,
            high: 1 << 33,
        };
        assert_eq!(counts.product(), None);
        assert_eq!(counts.total(), Some(1 << 34));

        let counts = PulseCounts {
            low: u64::MAX,
            high: 1,
        };
        assert_eq!(counts.product(), Some(u64::MAX));
        assert_eq!(counts.total(), None);
    }

    #[test]
    fn test_declared_untyped_module_stays_silent() {
        let graph = ModuleGraph::parse("broadcaster -> relay, con\nrelay -> con\n&con -> out")
            .unwrap();
        let mut ctx = SimulationContext::new(graph);
        ctx.press().unwrap();

        assert_eq!(ctx.counts(), PulseCounts { low: 3, high: 1 });
        assert_eq!(
            ctx.graph().module("relay").unwrap().sink_counts(),
            Some(SinkCounts { high: 0, low: 1 })
        );
        assert_eq!(
            ctx.graph().module("out").unwrap().sink_counts(),
            Some(SinkCounts { high: 1, low: 0 })
        );
    }

    #[test]
    fn test_button_pulse_is_counted_once() {
        let mut ctx = SimulationContext::new(ModuleGraph::parse("broadcaster -> out").unwrap());
        let counts = ctx.run_presses(3).unwrap();
        assert_eq!(counts, PulseCounts { low: 6, high: 0 });
        assert_eq!(
            ctx.graph().module("out").unwrap().sink_counts(),
            Some(SinkCounts { high: 0, low: 3 })
        );
    }

    #[test]
    fn test_flip_flop_emits_high_on_every_other_low() {
        let graph = ModuleGraph::parse("broadcaster -> ff\n%ff -> out").unwrap();
        let mut ctx = SimulationContext::new(graph);
        let mut recorder = Recorder::default();
        for _ in 0..6 {
            ctx.press_with(&mut recorder).unwrap();
        }
        let from_ff: Vec<(u64, PulseLevel)> = recorder
            .pulses
            .iter()
            .filter(|(_, pulse)| pulse.source == ModuleId::from("ff"))
            .map(|(press, pulse)| (*press, pulse.level))
            .collect();
        assert_eq!(
            from_ff,
            vec![
                (1, PulseLevel::High),
                (2, PulseLevel::Low),
                (3, PulseLevel::High),
                (4, PulseLevel::Low),
                (5, PulseLevel::High),
                (6, PulseLevel::Low),
            ]
        );
    }

    #[test]
    fn test_missing_broadcaster() {
        let mut ctx = SimulationContext::new(ModuleGraph::parse("%a -> b").unwrap());
        assert_eq!(
            ctx.press().unwrap_err(),
            SimError::UnknownModule(ModuleId::from("broadcaster"))
        );
        assert_eq!(ctx.counts(), PulseCounts::default());
    }

    #[test]
    fn test_custom_broadcaster_name() {
        let config = SimulationConfig::new().with_broadcaster("start");
        let graph = ModuleGraph::parse("start -> out").unwrap();
        let mut ctx = SimulationContext::with_config(graph, config);
        // "start" is not the broadcaster keyword, so it parses as a sink
        assert_eq!(ctx.press().unwrap(), 1);
        assert_eq!(ctx.counts(), PulseCounts { low: 1, high: 0 });
    }
}
