/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`          — Interactive streaming chat session
- `conversations` — Conversation listing, display, and creation
- `catalog`       — Model, tool, and agent catalog listings

These handlers are intentionally small and use the library components:
the API client, the message store, and the completion turn driver.
*/

pub mod catalog;
pub mod chat;
pub mod conversations;
