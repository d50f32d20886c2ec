//! Cross-crate scenarios driving the engine with deterministic fakes.

#[cfg(test)]
mod fakes;
#[cfg(test)]
mod pipeline;
#[cfg(test)]
mod scan;
