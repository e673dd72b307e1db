mod backend;

pub use backend::StubBackend;
