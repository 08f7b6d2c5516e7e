//! Cross-module scenario tests for the forest encoder and decoder
