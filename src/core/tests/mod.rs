mod simulation_context_tests;

/// Wiring shared by several test modules
pub(crate) const SCENARIO_A: &str = "broadcaster -> a, b, c
%a -> b
%b -> c
%c -> inv
&inv -> a";

pub(crate) const SCENARIO_B: &str = "broadcaster -> a
%a -> inv, con
&inv -> b
%b -> con
&con -> output";

/// `fa` first sends high to `hub` on press 3, `b2` on press 4
pub(crate) const TWO_FEEDER_ACTIVATION: &str = "broadcaster -> a0, b0
%a0 -> a1, ca
%a1 -> ca
&ca -> fa
&fa -> hub
%b0 -> b1
%b1 -> b2
%b2 -> hub
&hub -> rx";
