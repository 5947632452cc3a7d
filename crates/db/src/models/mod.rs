pub mod execution_record;
