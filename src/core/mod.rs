// ─── CraftShell Core ───
// Backend architecture for the desktop game-client shell.
//
// Architecture:
//   core/
//     auth/        — Credential provider capability + authorization token
//     bridge       — Outbound event catalog + forwarder to the display process
//     environment  — Mode-keyed configuration + per-mode user-data paths
//     launch/      — Launch specification, command builder, supervisor
//     state/       — Global application state
//     window       — Display-process window factory

pub mod auth;
pub mod bridge;
pub mod environment;
pub mod error;
pub mod launch;
pub mod state;
pub mod window;
