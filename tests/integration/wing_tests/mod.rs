mod avl_input;
