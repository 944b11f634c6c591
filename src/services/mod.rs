pub mod media_library;
