// Business logic services layer
//
// This module contains the storage-independent logic used by the CLI
// commands.

pub mod ordering;
