//! Host Scheduling Module
//!
//! Chooses which storage nodes should serve a file fragment or run a program.
//!
//! ## Pipeline
//! 1. **Candidates**: A fixed-length list of host names (explicit list, all registered hosts,
//!    or the replica holders of a section).
//! 2. **Filter**: Keeps hosts in a domain, in a name set (architecture or fsngroup
//!    compatible), or everything.
//! 3. **Probe**: Queries the load of accepted hosts with bounded concurrency, stopping early
//!    once enough idle hosts answered.
//! 4. **Rank**: Stable ascending sort on the 1-minute load average.
//! 5. **Expand**: When fewer hosts answered than requested, the ranked list is repeated.
//!
//! ## Submodules
//! - **`scheduler`**: The public entry points (`Scheduler`).
//! - **`search`**: Ranking, cyclic expansion and the idle host search.
//! - **`prober`**: Bounded-concurrency load probing.
//! - **`arch`**: Program to compatible host resolution.
//! - **`candidates`** / **`filter`**: Candidate sources and host filters.
//! - **`error`**: The scheduling error taxonomy.

pub mod arch;
pub mod candidates;
pub mod error;
pub mod filter;
pub mod prober;
pub mod scheduler;
pub mod search;
