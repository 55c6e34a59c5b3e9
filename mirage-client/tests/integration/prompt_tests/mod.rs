mod test_custom_prompt_drain;
