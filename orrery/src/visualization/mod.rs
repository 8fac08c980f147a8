pub mod render_handle;
