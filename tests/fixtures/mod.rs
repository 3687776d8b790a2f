pub mod sample_scenes;
