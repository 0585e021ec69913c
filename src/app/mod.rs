pub mod importers;
