pub mod llm_stub;
